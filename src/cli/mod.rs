mod commands;

use std::path::PathBuf;

use chemhelp::{Error, ParseError, PeriodicTable};
use clap::Parser;
use tracing_subscriber::EnvFilter;

pub fn run_from_env() -> i32 {
    match run(std::env::args().skip(1)) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {error}");
            2
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("chemhelp".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    let cli = match Cli::try_parse_from(&full_args) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(0);
            }
            _ => return Err(CliError::Usage(err.to_string())),
        },
    };
    init_tracing(cli.verbose);
    let out = execute(&cli)?;
    println!("{out}");
    Ok(0)
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // a second init (from tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "chemhelp",
    about = "Composition and molar mass of chemical formulas",
    after_help = "Formula syntax, per element: optional ^MASS for a specific isotope, \
                  the symbol, then an optional amount. Group with parentheses, \
                  optionally followed by a multiplier: ^13CH3(CH2)2OH, Mg(OH)2"
)]
struct Cli {
    /// Periodic table JSON to use instead of the built-in one
    #[arg(long, global = true, value_name = "PATH")]
    table: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log more (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Nominal and precise weight, optionally of some elements only
    Weight(commands::WeightArgs),
    /// Atom count per element
    Composition(commands::FormulaArgs),
    /// Re-render a formula the way it was understood
    Show(commands::FormulaArgs),
    /// Look up an element by atomic number, symbol, or name
    Lookup(commands::LookupArgs),
    /// Exact mass of one isotope
    Isotope(commands::IsotopeArgs),
    /// Convert between entities, moles, and grams of a compound
    Convert(commands::ConvertArgs),
    /// Weigh every component of a mixture separately
    Mixture(commands::MixtureArgs),
}

fn execute(cli: &Cli) -> Result<String, CliError> {
    let loaded;
    let table = match &cli.table {
        Some(path) => {
            loaded = PeriodicTable::load(path)?;
            &loaded
        }
        None => PeriodicTable::try_standard()?,
    };
    let out = match &cli.command {
        CliCommand::Weight(args) => commands::weight(table, args)?,
        CliCommand::Composition(args) => commands::composition(args)?,
        CliCommand::Show(args) => commands::show(args)?,
        CliCommand::Lookup(args) => commands::lookup(table, args)?,
        CliCommand::Isotope(args) => commands::isotope(table, args)?,
        CliCommand::Convert(args) => commands::convert(table, args)?,
        CliCommand::Mixture(args) => commands::mixture(table, args)?,
    };
    Ok(if cli.json {
        serde_json::to_string_pretty(&out.json)?
    } else {
        out.text
    })
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    /// a formula that did not parse, pointed at
    #[error("{error}\n  {input}\n  {}^", " ".repeat(caret_column(.input, .error.offset())))]
    Parse { input: String, error: ParseError },
    #[error(transparent)]
    Compute(#[from] Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// column of the char at byte `offset`
fn caret_column(input: &str, offset: usize) -> usize {
    input.get(..offset).map_or(offset, |s| s.chars().count())
}
