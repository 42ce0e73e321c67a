//! Expressions holding several independent formulas, like `H2O.NaCl`

use serde::Serialize;
use tracing::debug;

use crate::{error::ParseError, formula::Formula};

pub const DEFAULT_SEPARATOR: char = '.';

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Mixture {
    components: Vec<Formula>,
}

impl Mixture {
    /// Parse every `separator`-delimited piece of `expr` on its own. An error
    /// in any piece fails the whole mixture, with offsets into `expr`.
    pub fn parse(expr: &str, separator: char) -> Result<Self, ParseError> {
        let mut components = Vec::new();
        let mut start = 0;
        for piece in expr.split(separator) {
            let formula = Formula::parse(piece).map_err(|e| e.shifted(start))?;
            components.push(formula);
            start += piece.len() + separator.len_utf8();
        }
        debug!(components = components.len(), "parsed mixture");
        Ok(Self { components })
    }

    pub fn components(&self) -> &[Formula] {
        &self.components
    }

    pub fn into_components(self) -> Vec<Formula> {
        self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

pub fn split_mixture(expr: &str, separator: char) -> Result<Vec<Formula>, ParseError> {
    Mixture::parse(expr, separator).map(Mixture::into_components)
}
