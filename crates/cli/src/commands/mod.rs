pub mod add;
pub mod config;
pub mod list;
pub mod search;
pub mod session;

use std::path::Path;

use rust_decimal::Decimal;
use serde::Serialize;
use shelf_core::{Catalog, PersistenceError, Product};

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self { exit_code: EXIT_OK, output: output.into() }
    }

    pub fn failure(output: impl Into<String>) -> Self {
        Self { exit_code: EXIT_FAILURE, output: output.into() }
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        Self::success(lines.join("\n"))
    }
}

/// JSON view of one product for `--json` output.
#[derive(Debug, Serialize)]
struct ProductPayload<'a> {
    name: &'a str,
    category: &'a str,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    highlighted: Option<bool>,
}

impl<'a> ProductPayload<'a> {
    fn new(product: &'a Product, highlighted: Option<bool>) -> Self {
        Self { name: product.name(), category: product.category(), price: product.price(), highlighted }
    }
}

/// Loads the catalog for a one-shot command. A missing file yields an empty catalog.
fn load_catalog(path: &Path) -> Result<Catalog, PersistenceError> {
    let mut catalog = Catalog::new();
    catalog.load(path)?;
    Ok(catalog)
}

fn load_failure(error: &PersistenceError) -> CommandResult {
    CommandResult::failure(format!("{} ({error})", error.user_message()))
}

fn serialize_payload<T: Serialize>(payload: &T) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|error| {
        format!(
            "{{\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
