//! Element composition and molar mass of chemical formulas like `Mg(OH)2`,
//! `^13CH4`, or `H2O.NaCl`

pub mod charge;
pub mod error;
pub mod formula;
pub mod mixture;
pub mod periodic;
pub mod quantity;

pub use error::{Error, ParseError, Result};
pub use formula::{
    composition, element_symbols, parse, weight, Composition, Formula, WeightPair,
};
pub use mixture::{split_mixture, Mixture};
pub use periodic::PeriodicTable;
