use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("product name cannot be empty")]
    BlankName,
    #[error("category cannot be empty")]
    BlankCategory,
    #[error("price cannot be negative (got {0})")]
    NegativePrice(Decimal),
    #[error("price cannot exceed {max} (got {price})")]
    PriceTooLarge { price: Decimal, max: Decimal },
    #[error("`{0}` is not a valid price")]
    UnparsablePrice(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("a product with name `{name}` and category `{category}` already exists")]
    DuplicateKey { name: String, category: String },
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("could not read product file `{path}`: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("could not write product file `{path}`: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error("could not parse product file `{path}`: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("could not serialize products for `{path}`: {source}")]
    Serialize { path: PathBuf, source: serde_json::Error },
    #[error("product file `{path}` has an invalid record at index {index}: {reason}")]
    InvalidRecord { path: PathBuf, index: usize, reason: DomainError },
    #[error("stored products are inconsistent: {reason}")]
    InvalidStore { reason: DomainError },
}

impl PersistenceError {
    /// File involved in the failure; `None` for stores that are not file backed.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::Parse { path, .. }
            | Self::Serialize { path, .. }
            | Self::InvalidRecord { path, .. } => Some(path.as_path()),
            Self::InvalidStore { .. } => None,
        }
    }

    /// Short sentence suitable for printing to the operator.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Read { .. } => "The product file could not be read.",
            Self::Write { .. } | Self::Serialize { .. } => "The product list could not be saved.",
            Self::Parse { .. } | Self::InvalidRecord { .. } => {
                "The product file is corrupted and was not loaded."
            }
            Self::InvalidStore { .. } => "The stored products are inconsistent and were not loaded.",
        }
    }
}
