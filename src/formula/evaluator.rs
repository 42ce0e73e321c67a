use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, trace};

use crate::{error::Result, periodic::PeriodicTable};

use super::{Formula, Leaf, Node};

/// Nominal and precise weight of a formula, in u
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WeightPair {
    /// Truncated toward zero at every group boundary, not just at the end,
    /// so `((O)2)5` and `O10` disagree here while agreeing on `precise`
    pub nominal: i64,
    pub precise: f64,
}

impl WeightPair {
    pub const ZERO: WeightPair = WeightPair {
        nominal: 0,
        precise: 0.0,
    };

    /// `self` as a percentage of `total` by precise weight. NaN if `total`
    /// weighs nothing.
    pub fn percent_of(&self, total: &WeightPair) -> f64 {
        self.precise / total.precise * 100.0
    }
}

/// Weighs formulas against a [PeriodicTable].
///
/// Leaves without an isotope use the table's standard weight for both
/// figures. Isotope leaves add their mass number to the nominal weight and
/// the particle sum from [PeriodicTable::isotope_weight] to the precise one.
pub struct Evaluator<'a> {
    table: &'a PeriodicTable,
    restrict: Option<HashSet<&'a str>>,
    charge: Option<i32>,
}

impl<'a> Evaluator<'a> {
    pub fn new(table: &'a PeriodicTable) -> Self {
        Self {
            table,
            restrict: None,
            charge: None,
        }
    }

    /// only count leaves whose symbol is in `symbols`
    pub fn restrict_to<I>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.restrict = Some(symbols.into_iter().collect());
        self
    }

    /// Charge used for the electron count of every isotope leaf. Without it
    /// each element's primary characteristic charge is used.
    pub fn charge(mut self, charge: i32) -> Self {
        self.charge = Some(charge);
        self
    }

    pub fn eval(&self, formula: &Formula) -> Result<WeightPair> {
        let ret = self.sum(formula.nodes())?;
        debug!(%formula, nominal = ret.nominal, precise = ret.precise, "weighed");
        Ok(ret)
    }

    fn includes(&self, symbol: &str) -> bool {
        self.restrict.as_ref().map_or(true, |r| r.contains(symbol))
    }

    fn sum(&self, nodes: &[Node]) -> Result<WeightPair> {
        let mut nominal = 0.0;
        let mut precise = 0.0;
        for node in nodes {
            match node {
                Node::Leaf(leaf) if !self.includes(&leaf.symbol) => {}
                Node::Leaf(leaf) => {
                    let (n, p) = self.leaf(leaf)?;
                    nominal += n;
                    precise += p;
                }
                Node::Group(group) => {
                    let inner = self.sum(&group.children)?;
                    let k = f64::from(group.multiplier);
                    nominal += inner.nominal as f64 * k;
                    precise += inner.precise * k;
                }
            }
        }
        Ok(WeightPair {
            nominal: nominal.trunc() as i64,
            precise,
        })
    }

    fn leaf(&self, leaf: &Leaf) -> Result<(f64, f64)> {
        let amount = f64::from(leaf.amount);
        let (nominal, precise) = match leaf.isotope {
            None => {
                let w = self.table.standard_weight(&leaf.symbol)?;
                (w, w)
            }
            Some(m) => {
                let w = self.table.isotope_weight(&leaf.symbol, m, self.charge)?;
                (f64::from(m), w)
            }
        };
        trace!(symbol = %leaf.symbol, isotope = ?leaf.isotope, amount = leaf.amount, precise);
        Ok((amount * nominal, amount * precise))
    }
}

#[cfg(test)]
mod tests {
    use once_cell::sync::Lazy;

    use crate::error::Error;

    use super::*;

    static TABLE: Lazy<PeriodicTable> = Lazy::new(|| {
        PeriodicTable::from_json(include_str!("../../data/elements.json")).unwrap()
    });

    fn assert_approx(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() < tol,
            "expected {expected} ± {tol}, got {actual}"
        );
    }

    fn weigh(s: &str) -> WeightPair {
        Evaluator::new(&TABLE)
            .eval(&Formula::parse(s).unwrap())
            .unwrap()
    }

    #[test]
    fn water() {
        let got = weigh("H2O");
        assert_eq!(got.nominal, 18);
        assert_approx(got.precise, 18.01528, 1e-9);
    }

    #[test]
    fn carbon_12() {
        let got = weigh("^12C");
        assert_eq!(got.nominal, 12);
        let p = TABLE.particles();
        assert_approx(
            got.precise,
            6.0 * p.proton + 6.0 * p.neutron + 6.0 * p.electron,
            1e-12,
        );
        assert!((got.precise - 12.0107).abs() > 0.05);
    }

    #[test]
    fn nominal_truncates_per_group() {
        let nested = weigh("((O)2)5");
        let flat = weigh("O10");
        // 15 * 2 * 5 vs trunc(159.994)
        assert_eq!(nested.nominal, 150);
        assert_eq!(flat.nominal, 159);
        assert_approx(nested.precise, flat.precise, 1e-9);
        assert_approx(flat.precise, 159.994, 1e-9);
    }

    #[test]
    fn nominal_mixes_isotopes_and_averages() {
        // trunc(2.01588) = 2 inside the group, times 3, plus 13
        let got = weigh("(H2)3^13C");
        assert_eq!(got.nominal, 19);
        // trunc(1.00794 * 3 + 13) = 16
        assert_eq!(weigh("H3^13C").nominal, 16);
    }

    #[test]
    fn restricted() {
        let f = Formula::parse("H2O").unwrap();
        let total = Evaluator::new(&TABLE).eval(&f).unwrap();
        let oxygen = Evaluator::new(&TABLE).restrict_to(["O"]).eval(&f).unwrap();
        assert_eq!(oxygen.nominal, 15);
        assert_approx(oxygen.precise, 15.9994, 1e-9);
        let pct = oxygen.percent_of(&total);
        assert!(pct > 0.0 && pct <= 100.0);
        assert_approx(pct, 15.9994 / 18.01528 * 100.0, 1e-9);

        let none = Evaluator::new(&TABLE).restrict_to(["Na"]).eval(&f).unwrap();
        assert_eq!(none, WeightPair::ZERO);
    }

    #[test]
    fn restricted_inside_groups() {
        let f = Formula::parse("Ca(OH)2").unwrap();
        let got = Evaluator::new(&TABLE).restrict_to(["H"]).eval(&f).unwrap();
        assert_eq!(got.nominal, 2);
        assert_approx(got.precise, 2.0 * 1.00794, 1e-9);
    }

    #[test]
    fn restriction_skips_unknown_symbols() {
        let f = Formula::parse("XyO").unwrap();
        assert!(Evaluator::new(&TABLE).restrict_to(["O"]).eval(&f).is_ok());
        assert!(matches!(
            Evaluator::new(&TABLE).eval(&f),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn charge_override() {
        let f = Formula::parse("^1H").unwrap();
        let p = TABLE.particles();
        let default = Evaluator::new(&TABLE).eval(&f).unwrap();
        assert_approx(default.precise, p.proton, 1e-12);
        let neutral = Evaluator::new(&TABLE).charge(0).eval(&f).unwrap();
        assert_approx(neutral.precise, p.proton + p.electron, 1e-12);
        assert_eq!(default.nominal, neutral.nominal);
    }

    #[test]
    fn invalid_isotope() {
        let f = Formula::parse("^4Na").unwrap();
        assert!(matches!(
            Evaluator::new(&TABLE).eval(&f),
            Err(Error::InvalidIsotope { protons: 11, .. })
        ));
    }

    #[test]
    fn missing_weight() {
        let table = PeriodicTable::from_json(
            r#"{"elements": [
                {"number": 1, "symbol": "H", "name": "Hydrogen", "weight": 1.0},
                {"number": 300, "symbol": "Zz", "name": "Hypothetium"}
            ]}"#,
        )
        .unwrap();
        let f = Formula::parse("ZzH").unwrap();
        assert!(matches!(
            Evaluator::new(&table).eval(&f),
            Err(Error::MissingWeight(s)) if s == "Zz"
        ));
        // an explicit isotope needs no standard weight
        let f = Formula::parse("^700Zz").unwrap();
        assert_eq!(Evaluator::new(&table).eval(&f).unwrap().nominal, 700);
    }
}
