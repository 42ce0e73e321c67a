//! Chemical formula parser and weight evaluator

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use serde::Serialize;
use tracing::debug;

use crate::{
    error::{ParseError, Result},
    periodic::PeriodicTable,
};

use self::{parser::Parser, scanner::scan};

pub use self::{
    evaluator::{Evaluator, WeightPair},
    flattener::Composition,
};

mod evaluator;
mod flattener;
mod parser;
mod scanner;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Leaf {
    pub symbol: String,
    pub amount: u32,
    /// mass number, when a specific isotope was asked for
    pub isotope: Option<u32>,
}

/// A parenthesized sub-formula. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Group {
    pub children: Vec<Node>,
    pub multiplier: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Leaf(Leaf),
    Group(Group),
}

/// A parsed formula: the top-level terms of an implicit group with
/// multiplier 1
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Formula {
    nodes: Vec<Node>,
}

impl Formula {
    pub fn parse(s: &str) -> std::result::Result<Self, ParseError> {
        let tokens = scan(s)?;
        debug!(tokens = tokens.len() - 1, "scanned formula");
        let nodes = Parser::new(tokens).parse()?;
        Ok(Self { nodes })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn composition(&self) -> Composition {
        flattener::flatten(&self.nodes)
    }

    pub fn weight(&self, table: &PeriodicTable) -> Result<WeightPair> {
        Evaluator::new(table).eval(self)
    }

    /// percentage of the precise weight contributed by `symbols`
    pub fn mass_percent<'a, I>(&self, table: &'a PeriodicTable, symbols: I) -> Result<f64>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let part = Evaluator::new(table).restrict_to(symbols).eval(self)?;
        let total = self.weight(table)?;
        Ok(part.percent_of(&total))
    }
}

impl FromStr for Formula {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'a> IntoIterator for &'a Formula {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

fn write_nodes(f: &mut Formatter<'_>, nodes: &[Node]) -> fmt::Result {
    for node in nodes {
        match node {
            Node::Leaf(leaf) => write!(f, "{leaf}")?,
            Node::Group(group) => {
                f.write_str("(")?;
                write_nodes(f, &group.children)?;
                f.write_str(")")?;
                if group.multiplier > 1 {
                    write!(f, "{}", group.multiplier)?;
                }
            }
        }
    }
    Ok(())
}

impl Display for Leaf {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // always keep the caret so the mass number is not read as the amount
        // of whatever came before
        if let Some(m) = self.isotope {
            write!(f, "^{m}")?;
        }
        f.write_str(&self.symbol)?;
        if self.amount > 1 {
            write!(f, "{}", self.amount)?;
        }
        Ok(())
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_nodes(f, &self.nodes)
    }
}

pub fn parse(expr: &str) -> std::result::Result<Formula, ParseError> {
    Formula::parse(expr)
}

/// Every element symbol written in `s`, in order, skipping anything that is
/// not one. Symbols are read the same way the formula scanner reads them.
pub fn element_symbols(s: &str) -> Vec<&str> {
    scanner::symbols(s)
}

pub fn composition(formula: &Formula) -> Composition {
    formula.composition()
}

/// Weight of `formula`, counting only the elements in `restrict_to` when it
/// is given
pub fn weight<'a>(
    formula: &Formula,
    table: &'a PeriodicTable,
    restrict_to: Option<&[&'a str]>,
) -> Result<WeightPair> {
    let evaluator = Evaluator::new(table);
    match restrict_to {
        Some(symbols) => evaluator.restrict_to(symbols.iter().copied()).eval(formula),
        None => evaluator.eval(formula),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let cases = [
            ("H2O", "H2O"),
            ("Mg (O H)2", "Mg(OH)2"),
            ("(H2)1", "(H2)"),
            ("^13C_2 H4", "^13C2H4"),
            ("H2 2H", "H2^2H"),
            ("Cu(NO3)2(H2O)6", "Cu(NO3)2(H2O)6"),
            ("((H2)3)2", "((H2)3)2"),
            ("", ""),
        ];
        for (input, want) in cases {
            assert_eq!(Formula::parse(input).unwrap().to_string(), want);
        }
    }

    #[test]
    fn multiplier_follows_paren_directly() {
        // a lone number after the space is a mass number with no element
        assert_eq!(
            Formula::parse("Mg (O H) 2"),
            Err(ParseError::UnknownToken {
                fragment: "2".to_owned(),
                offset: 9,
            })
        );
    }

    #[test]
    fn symbols() {
        assert_eq!(element_symbols("CO"), vec!["C", "O"]);
        assert_eq!(element_symbols("Na, Cl"), vec!["Na", "Cl"]);
        assert_eq!(element_symbols("Mg2xO"), vec!["Mg", "O"]);
        assert!(element_symbols("oxygen").is_empty());
        assert!(element_symbols("").is_empty());
    }

    #[test]
    fn display_reparses() {
        for s in ["K4(Fe(CN)6)", "H2 2H", "Cu(NO3)2(H2O)6", "^235U F6"] {
            let f = Formula::parse(s).unwrap();
            assert_eq!(Formula::parse(&f.to_string()).unwrap(), f);
        }
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(parse("H2)"), Err(ParseError::UnmatchedClose { .. })));
        assert!(matches!(parse("(H2"), Err(ParseError::UnclosedGroup { .. })));
        assert!(matches!(parse("H2$"), Err(ParseError::UnknownToken { .. })));
        assert!("H2$".parse::<Formula>().is_err());
    }

    #[test]
    fn free_functions() {
        let table = PeriodicTable::standard();
        let f = parse("NaCl").unwrap();
        assert_eq!(composition(&f).len(), 2);
        let all = weight(&f, table, None).unwrap();
        let na = weight(&f, table, Some(&["Na"][..])).unwrap();
        assert_eq!(all.nominal, 58);
        assert_eq!(na.nominal, 22);
        let pct = f.mass_percent(table, ["Na", "Cl"]).unwrap();
        assert!((pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn serialize_tree() {
        let f = parse("(OH)2").unwrap();
        let got = serde_json::to_value(&f).unwrap();
        assert_eq!(
            got,
            serde_json::json!([{
                "kind": "group",
                "multiplier": 2,
                "children": [
                    {"kind": "leaf", "symbol": "O", "amount": 1, "isotope": null},
                    {"kind": "leaf", "symbol": "H", "amount": 1, "isotope": null}
                ]
            }])
        );
    }
}
