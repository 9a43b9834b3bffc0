use std::path::Path;

use serde::Serialize;

use crate::render::Renderer;

use super::{load_catalog, load_failure, serialize_payload, CommandResult, ProductPayload};

#[derive(Debug, Serialize)]
struct SearchPayload<'a> {
    term: &'a str,
    count: usize,
    products: Vec<ProductPayload<'a>>,
}

/// Prints matches in the order they were added.
pub fn run(path: &Path, renderer: &Renderer, term: &str, json: bool) -> CommandResult {
    if term.trim().is_empty() {
        return CommandResult::failure("search term cannot be empty");
    }

    let catalog = match load_catalog(path) {
        Ok(catalog) => catalog,
        Err(error) => return load_failure(&error),
    };

    let matches = catalog.search(term);
    if json {
        let payload = SearchPayload {
            term,
            count: matches.len(),
            products: matches.iter().copied().map(|product| ProductPayload::new(product, None)).collect(),
        };
        return CommandResult::success(serialize_payload(&payload));
    }

    if matches.is_empty() {
        return CommandResult::success(renderer.not_found(term));
    }

    let mut lines = vec![renderer.found(matches.len(), term)];
    lines.extend(matches.iter().map(|product| renderer.product_line(product)));
    CommandResult::from_lines(lines)
}
