use std::fmt::Write;

use chemhelp::{
    charge::{format_charge, parse_charge},
    element_symbols,
    formula::Evaluator,
    periodic::Lookup,
    quantity::Quantity,
    Formula, Mixture, PeriodicTable,
};
use serde::Serialize;
use serde_json::json;

use super::CliError;

/// What a command prints, in both output styles
pub(super) struct Output {
    pub(super) text: String,
    pub(super) json: serde_json::Value,
}

#[derive(clap::Args)]
pub(super) struct FormulaArgs {
    formula: String,
}

#[derive(clap::Args)]
pub(super) struct WeightArgs {
    formula: String,

    /// Only count these elements, e.g. "CO" for carbon and oxygen, and
    /// report their mass percent
    #[arg(long, value_name = "SYMBOLS")]
    of: Option<String>,

    /// Charge for the electron count of isotopes, like 2+ or 1-. Defaults
    /// to each element's primary charge
    #[arg(long, allow_hyphen_values = true)]
    charge: Option<String>,
}

#[derive(clap::Args)]
pub(super) struct LookupArgs {
    /// Atomic number, symbol, or name
    query: String,
}

#[derive(clap::Args)]
pub(super) struct IsotopeArgs {
    symbol: String,

    /// Mass number
    mass: u32,

    /// Charge, like 2+ or 1-. Defaults to the element's primary charge
    #[arg(long, allow_hyphen_values = true)]
    charge: Option<String>,
}

#[derive(clap::Args)]
#[command(group(clap::ArgGroup::new("amount").required(true).args(["entities", "moles", "grams"])))]
pub(super) struct ConvertArgs {
    formula: String,

    /// Number of molecules (or atoms), e notation allowed
    #[arg(long)]
    entities: Option<f64>,

    #[arg(long)]
    moles: Option<f64>,

    #[arg(long)]
    grams: Option<f64>,
}

#[derive(clap::Args)]
pub(super) struct MixtureArgs {
    expr: String,

    #[arg(long, default_value_t = chemhelp::mixture::DEFAULT_SEPARATOR)]
    separator: char,
}

fn parse_formula(s: &str) -> Result<Formula, CliError> {
    Formula::parse(s).map_err(|error| CliError::Parse {
        input: s.to_owned(),
        error,
    })
}

#[derive(Serialize)]
struct WeightReport {
    formula: String,
    nominal: i64,
    precise: f64,
    mass_percent: Option<f64>,
}

pub(super) fn weight(table: &PeriodicTable, args: &WeightArgs) -> Result<Output, CliError> {
    let formula = parse_formula(&args.formula)?;
    let mut evaluator = Evaluator::new(table);
    let mut full = Evaluator::new(table);
    if let Some(charge) = &args.charge {
        let charge = parse_charge(charge)?;
        evaluator = evaluator.charge(charge);
        full = full.charge(charge);
    }
    // nothing symbol-like in --of weighs the whole formula
    let of = args
        .of
        .as_deref()
        .map(element_symbols)
        .filter(|of| !of.is_empty());
    if let Some(of) = &of {
        evaluator = evaluator.restrict_to(of.iter().copied());
    }
    let w = evaluator.eval(&formula)?;
    let mass_percent = if of.is_some() {
        Some(w.percent_of(&full.eval(&formula)?))
    } else {
        None
    };

    let mut text = format!("Simple: {} u\nPrecise: {} u", w.nominal, w.precise);
    if let Some(pct) = mass_percent {
        write!(text, "\nMass percent: {pct}%").ok();
    }
    let report = WeightReport {
        formula: formula.to_string(),
        nominal: w.nominal,
        precise: w.precise,
        mass_percent,
    };
    Ok(Output {
        text,
        json: serde_json::to_value(report)?,
    })
}

pub(super) fn composition(args: &FormulaArgs) -> Result<Output, CliError> {
    let composition = parse_formula(&args.formula)?.composition();
    let text = composition
        .iter()
        .map(|(symbol, count)| format!("{symbol}\t{count}"))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Output {
        text,
        json: serde_json::to_value(composition)?,
    })
}

pub(super) fn show(args: &FormulaArgs) -> Result<Output, CliError> {
    let formula = parse_formula(&args.formula)?;
    Ok(Output {
        text: formula.to_string(),
        json: serde_json::to_value(&formula)?,
    })
}

pub(super) fn lookup(table: &PeriodicTable, args: &LookupArgs) -> Result<Output, CliError> {
    let element = table.lookup(Lookup::parse(&args.query))?;
    let weight = match element.weight {
        None => "unknown".to_owned(),
        // mass of the most stable isotope, not an average
        Some(w) if element.unstable => format!("({w})"),
        Some(w) => w.to_string(),
    };
    let charges = element
        .charge
        .as_ref()
        .map(|c| c.all())
        .unwrap_or_default()
        .into_iter()
        .map(|c| match format_charge(c) {
            s if s.is_empty() => "0".to_owned(),
            s => s,
        })
        .collect::<Vec<_>>();

    let mut text = format!("===== {} =====\n", element.name);
    writeln!(text, "number: {}", element.number).ok();
    writeln!(text, "symbol: {}", element.symbol).ok();
    writeln!(text, "weight: {weight}").ok();
    if charges.is_empty() {
        text.push_str("charges: none");
    } else {
        write!(text, "charges: {}", charges.join(", ")).ok();
    }
    Ok(Output {
        text,
        json: serde_json::to_value(element)?,
    })
}

pub(super) fn isotope(table: &PeriodicTable, args: &IsotopeArgs) -> Result<Output, CliError> {
    let charge = args.charge.as_deref().map(parse_charge).transpose()?;
    let precise = table.isotope_weight(&args.symbol, args.mass, charge)?;
    Ok(Output {
        text: format!("^{}{}: {precise} u", args.mass, args.symbol),
        json: json!({
            "symbol": args.symbol,
            "mass_number": args.mass,
            "charge": charge,
            "precise": precise,
        }),
    })
}

pub(super) fn convert(table: &PeriodicTable, args: &ConvertArgs) -> Result<Output, CliError> {
    let formula = parse_formula(&args.formula)?;
    let molar_mass = formula.weight(table)?.precise;
    let q = match (args.entities, args.moles, args.grams) {
        (Some(n), _, _) => Quantity::from_entities(n, molar_mass),
        (_, Some(m), _) => Quantity::from_moles(m, molar_mass),
        (_, _, Some(g)) => Quantity::from_grams(g, molar_mass),
        (None, None, None) => {
            return Err(CliError::Usage(
                "one of --entities, --moles, or --grams is required".to_owned(),
            ))
        }
    };
    Ok(Output {
        text: format!(
            "{:e} entities\n{:e} moles\n{:e} grams",
            q.entities, q.moles, q.grams
        ),
        json: serde_json::to_value(q)?,
    })
}

#[derive(Serialize)]
struct ComponentReport {
    formula: String,
    nominal: i64,
    precise: f64,
    composition: chemhelp::Composition,
}

pub(super) fn mixture(table: &PeriodicTable, args: &MixtureArgs) -> Result<Output, CliError> {
    let mixture =
        Mixture::parse(&args.expr, args.separator).map_err(|error| CliError::Parse {
            input: args.expr.clone(),
            error,
        })?;
    let mut reports = Vec::with_capacity(mixture.len());
    for formula in mixture.components() {
        let w = formula.weight(table)?;
        reports.push(ComponentReport {
            formula: formula.to_string(),
            nominal: w.nominal,
            precise: w.precise,
            composition: formula.composition(),
        });
    }
    let text = reports
        .iter()
        .map(|r| format!("{}: {} u ({} u)", r.formula, r.nominal, r.precise))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Output {
        text,
        json: serde_json::to_value(reports)?,
    })
}
