use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure to turn formula text into a tree. Offsets are byte offsets into
/// the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown token '{fragment}' at {offset}")]
    UnknownToken { fragment: String, offset: usize },
    #[error("invalid number '{fragment}' at {offset}")]
    InvalidNumber { fragment: String, offset: usize },
    #[error("unmatched close at {offset}")]
    UnmatchedClose { offset: usize },
    #[error("unclosed group opened at {offset}")]
    UnclosedGroup { offset: usize },
    #[error("empty group at {offset}")]
    EmptyGroup { offset: usize },
    /// an atom count that no longer fits in a `u64` once the multipliers up
    /// to the paren (or end of input) at `offset` are applied
    #[error("atom count overflows at {offset}")]
    CountOverflow { offset: usize },
}

impl ParseError {
    pub fn offset(&self) -> usize {
        match self {
            Self::UnknownToken { offset, .. }
            | Self::InvalidNumber { offset, .. }
            | Self::UnmatchedClose { offset }
            | Self::UnclosedGroup { offset }
            | Self::EmptyGroup { offset }
            | Self::CountOverflow { offset } => *offset,
        }
    }

    /// the same error with its offset moved `by` bytes to the right
    pub(crate) fn shifted(mut self, by: usize) -> Self {
        match &mut self {
            Self::UnknownToken { offset, .. }
            | Self::InvalidNumber { offset, .. }
            | Self::UnmatchedClose { offset }
            | Self::UnclosedGroup { offset }
            | Self::EmptyGroup { offset }
            | Self::CountOverflow { offset } => *offset += by,
        }
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("no element matches '{0}'")]
    NotFound(String),
    #[error("{symbol}-{mass_number} is impossible, {symbol} has {protons} protons")]
    InvalidIsotope {
        symbol: String,
        mass_number: u32,
        protons: u32,
    },
    #[error("no standard atomic weight for {0}")]
    MissingWeight(String),
    #[error("invalid charge '{0}'")]
    InvalidCharge(String),
    #[error("malformed periodic table: {0}")]
    Json(#[from] serde_json::Error),
    #[error("built-in periodic table is malformed: {0}")]
    Builtin(String),
    #[error("duplicate element '{0}' in periodic table")]
    DuplicateElement(String),
    #[error("failed to read periodic table '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse periodic table '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
}
