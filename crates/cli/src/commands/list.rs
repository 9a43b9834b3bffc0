use std::path::Path;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::render::Renderer;

use super::{load_catalog, load_failure, serialize_payload, CommandResult, ProductPayload};

#[derive(Debug, Serialize)]
struct ListingPayload<'a> {
    products: Vec<ProductPayload<'a>>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    total: Decimal,
}

pub fn run(path: &Path, renderer: &Renderer, highlight: Option<&str>, json: bool) -> CommandResult {
    let catalog = match load_catalog(path) {
        Ok(catalog) => catalog,
        Err(error) => return load_failure(&error),
    };

    let listing = catalog.list_sorted_by_price(highlight);
    if json {
        let payload = ListingPayload {
            products: listing
                .entries
                .iter()
                .map(|entry| {
                    ProductPayload::new(entry.product, highlight.map(|_| entry.highlighted))
                })
                .collect(),
            total: listing.total,
        };
        return CommandResult::success(serialize_payload(&payload));
    }

    CommandResult::from_lines(renderer.listing(&listing))
}
