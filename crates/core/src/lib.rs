//! Product catalog core: duplicate-aware add, search, price-sorted listing, and JSON
//! persistence. Nothing in this crate touches a terminal.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod store;

pub use catalog::{Catalog, ListingEntry, LoadOutcome, PriceListing};
pub use domain::product::{parse_price, Product, ProductKey, MAX_PRICE};
pub use errors::{DomainError, PersistenceError, ValidationError};
pub use store::{InMemoryStore, JsonFileStore, ProductStore, DEFAULT_PRODUCT_FILE};
