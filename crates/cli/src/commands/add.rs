use std::path::Path;

use shelf_core::{parse_price, DomainError, Product};
use tracing::info;

use crate::render::Renderer;

use super::{load_catalog, load_failure, CommandResult};

/// Adds one product and saves. A file that fails to load is never overwritten.
pub fn run(path: &Path, renderer: &Renderer, name: &str, category: &str, price: &str) -> CommandResult {
    let product = match parse_price(price).and_then(|price| Product::new(name, category, price)) {
        Ok(product) => product,
        Err(error) => return CommandResult::failure(format!("invalid product: {error}")),
    };

    let mut catalog = match load_catalog(path) {
        Ok(catalog) => catalog,
        Err(error) => return load_failure(&error),
    };

    if let Err(error) = catalog.add(product) {
        return match error {
            DomainError::DuplicateKey { name, category } => {
                CommandResult::failure(renderer.duplicate(&name, &category))
            }
            DomainError::Validation(error) => {
                CommandResult::failure(format!("invalid product: {error}"))
            }
        };
    }

    if let Err(error) = catalog.save(path) {
        return CommandResult::failure(renderer.error("Error saving products", &error.to_string()));
    }

    info!(event_name = "cli.add.saved", count = catalog.len(), path = %path.display(), "product added");
    CommandResult::success(format!("Product added successfully! ({} in catalog)", catalog.len()))
}
