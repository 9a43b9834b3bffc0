use std::path::Path;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::domain::product::{Product, ProductKey};
use crate::errors::{DomainError, PersistenceError};
use crate::store::{JsonFileStore, ProductStore};

/// Result of a load attempt that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { count: usize },
    NotFound,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingEntry<'a> {
    pub product: &'a Product,
    pub highlighted: bool,
}

/// Products ordered by ascending price plus the sum of every price.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceListing<'a> {
    pub entries: Vec<ListingEntry<'a>>,
    pub total: Decimal,
}

impl PriceListing<'_> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn highlighted_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.highlighted).count()
    }
}

/// In-memory product list in insertion order.
///
/// No two products share a case-insensitive `(name, category)` pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Result<Self, DomainError> {
        let mut catalog = Self::new();
        for product in products {
            catalog.add(product)?;
        }
        Ok(catalog)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find(&self, key: &ProductKey) -> Option<&Product> {
        self.products.iter().find(|product| &product.key() == key)
    }

    pub fn contains_key(&self, key: &ProductKey) -> bool {
        self.find(key).is_some()
    }

    /// Appends `product` unless an entry with the same key exists. On rejection the
    /// error names the existing entry and the catalog is untouched.
    pub fn add(&mut self, product: Product) -> Result<(), DomainError> {
        if let Some(existing) = self.find(&product.key()) {
            warn!(
                event_name = "catalog.add.rejected",
                name = existing.name(),
                category = existing.category(),
                "duplicate product rejected"
            );
            return Err(DomainError::DuplicateKey {
                name: existing.name().to_string(),
                category: existing.category().to_string(),
            });
        }

        debug!(
            event_name = "catalog.add.accepted",
            name = product.name(),
            category = product.category(),
            price = %product.price(),
            "product added"
        );
        self.products.push(product);
        Ok(())
    }

    /// Products whose name or category contains `term`, ignoring case, in insertion
    /// order. The term is not trimmed; an empty term matches nothing.
    pub fn search(&self, term: &str) -> Vec<&Product> {
        self.products.iter().filter(|product| product.matches(term)).collect()
    }

    /// Sum of every price. Prices are capped at `MAX_PRICE`, so the sum only saturates
    /// for catalogs far beyond what fits in memory.
    pub fn total_price(&self) -> Decimal {
        self.products
            .iter()
            .map(Product::price)
            .fold(Decimal::ZERO, |total, price| total.saturating_add(price))
    }

    pub fn list_sorted_by_price(&self, highlight: Option<&str>) -> PriceListing<'_> {
        let mut sorted: Vec<&Product> = self.products.iter().collect();
        // stable: equal prices keep insertion order
        sorted.sort_by_key(|product| product.price());

        let entries = sorted
            .into_iter()
            .map(|product| ListingEntry {
                product,
                highlighted: highlight.is_some_and(|term| product.matches(term)),
            })
            .collect();

        PriceListing { entries, total: self.total_price() }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        self.save_to(&JsonFileStore::new(path.as_ref()))
    }

    pub fn save_to<S: ProductStore>(&self, store: &S) -> Result<(), PersistenceError> {
        store.save(&self.products)?;
        info!(event_name = "catalog.saved", count = self.products.len(), "product list saved");
        Ok(())
    }

    /// Replaces the catalog with the file's contents. A missing file leaves the catalog
    /// as it is. Any read, parse, or record failure also leaves the current products in
    /// place: the file is decoded completely before anything is swapped in.
    ///
    /// Products from any store are re-checked for duplicate keys before the swap.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<LoadOutcome, PersistenceError> {
        self.load_from(&JsonFileStore::new(path.as_ref()))
    }

    pub fn load_from<S: ProductStore>(&mut self, store: &S) -> Result<LoadOutcome, PersistenceError> {
        let products = match store.load() {
            Ok(Some(products)) => products,
            Ok(None) => {
                info!(event_name = "catalog.load.not_found", "no stored products, starting empty");
                return Ok(LoadOutcome::NotFound);
            }
            Err(error) => {
                warn!(event_name = "catalog.load.failed", error = %error, "keeping current products");
                return Err(error);
            }
        };

        let loaded = Self::from_products(products).map_err(|reason| {
            let error = PersistenceError::InvalidStore { reason };
            warn!(event_name = "catalog.load.failed", error = %error, "keeping current products");
            error
        })?;

        *self = loaded;
        info!(event_name = "catalog.loaded", count = self.products.len(), "product list loaded");
        Ok(LoadOutcome::Loaded { count: self.products.len() })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use crate::domain::product::{Product, ProductKey, MAX_PRICE};
    use crate::errors::{DomainError, PersistenceError};
    use crate::store::{InMemoryStore, ProductStore};

    use super::{Catalog, LoadOutcome};

    fn product(name: &str, category: &str, cents: i64) -> Product {
        Product::new(name, category, Decimal::new(cents, 2)).expect("valid product")
    }

    fn prices(catalog: &Catalog, highlight: Option<&str>) -> Vec<(String, Decimal, bool)> {
        catalog
            .list_sorted_by_price(highlight)
            .entries
            .into_iter()
            .map(|entry| (entry.product.name().to_string(), entry.product.price(), entry.highlighted))
            .collect()
    }

    #[test]
    fn rejects_case_insensitive_duplicate_and_keeps_state() {
        let mut catalog = Catalog::new();
        catalog.add(product("Running Shoe", "Shoes", 4999)).expect("first add");

        let error = catalog.add(product("RUNNING SHOE", "shoes", 1000)).expect_err("duplicate");

        assert_eq!(
            error,
            DomainError::DuplicateKey { name: "Running Shoe".to_string(), category: "Shoes".to_string() }
        );
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.products()[0].price(), Decimal::new(4999, 2));
    }

    #[test]
    fn same_name_in_different_category_is_distinct() {
        let mut catalog = Catalog::new();
        catalog.add(product("Apple", "Fruit", 100)).expect("fruit");
        catalog.add(product("Apple", "Electronics", 99_900)).expect("electronics");

        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains_key(&ProductKey::new("apple", "ELECTRONICS")));
    }

    #[test]
    fn listing_is_price_ascending_and_stable_on_ties() {
        let catalog = Catalog::from_products([
            product("Lamp", "Home", 999),
            product("Pen", "Office", 150),
            product("Cup", "Kitchen", 150),
            product("Chair", "Home", 2000),
        ])
        .expect("distinct products");

        let listing = catalog.list_sorted_by_price(None);
        let names: Vec<&str> = listing.entries.iter().map(|entry| entry.product.name()).collect();

        assert_eq!(names, vec!["Pen", "Cup", "Lamp", "Chair"]);
        assert_eq!(listing.total, Decimal::new(999 + 150 + 150 + 2000, 2));
        assert_eq!(listing.highlighted_count(), 0);
    }

    #[test]
    fn empty_catalog_lists_nothing_with_zero_total() {
        let catalog = Catalog::new();
        let listing = catalog.list_sorted_by_price(Some("x"));

        assert!(listing.is_empty());
        assert_eq!(listing.total, Decimal::ZERO);
    }

    #[test]
    fn listing_flags_highlighted_entries() {
        let catalog = Catalog::from_products([
            product("Running Shoe", "Sport", 5000),
            product("Shirt", "Tops", 1500),
            product("Boot", "Shoes", 8000),
        ])
        .expect("distinct products");

        assert_eq!(
            prices(&catalog, Some("SHOE")),
            vec![
                ("Shirt".to_string(), Decimal::new(1500, 2), false),
                ("Running Shoe".to_string(), Decimal::new(5000, 2), true),
                ("Boot".to_string(), Decimal::new(8000, 2), true),
            ]
        );
        assert!(prices(&catalog, Some("")).iter().all(|(_, _, highlighted)| !highlighted));
    }

    #[test]
    fn search_matches_name_or_category_in_insertion_order() {
        let catalog = Catalog::from_products([
            product("Shirt", "Tops", 1500),
            product("Boot", "Shoes", 8000),
            product("Running Shoe", "Sport", 5000),
        ])
        .expect("distinct products");

        let names: Vec<&str> = catalog.search("shoe").into_iter().map(Product::name).collect();

        assert_eq!(names, vec!["Boot", "Running Shoe"]);
        assert!(catalog.search("").is_empty());
    }

    #[test]
    fn search_uses_the_term_as_given() {
        let catalog = Catalog::from_products([product("Boot", "Shoes", 8000), product("Running Shoe", "Sport", 5000)])
            .expect("distinct products");

        let leading_space: Vec<&str> = catalog.search(" shoe").into_iter().map(Product::name).collect();
        let single_space: Vec<&str> = catalog.search(" ").into_iter().map(Product::name).collect();

        assert_eq!(leading_space, vec!["Running Shoe"]);
        assert_eq!(single_space, vec!["Running Shoe"]);
    }

    #[test]
    fn listing_many_max_priced_products_does_not_overflow() {
        let catalog = Catalog::from_products([
            Product::new("Yacht", "Boats", MAX_PRICE).expect("valid product"),
            Product::new("Jet", "Planes", MAX_PRICE).expect("valid product"),
            Product::new("Island", "Property", MAX_PRICE).expect("valid product"),
        ])
        .expect("distinct products");

        let listing = catalog.list_sorted_by_price(None);

        assert_eq!(listing.entries.len(), 3);
        assert_eq!(listing.total, MAX_PRICE * Decimal::from(3));
    }

    #[test]
    fn prices_beyond_the_ceiling_never_reach_the_catalog() {
        assert!(Product::new("Planet", "Misc", Decimal::MAX).is_err());

        let mut catalog = Catalog::from_products([product("Mug", "Kitchen", 100)]).expect("catalog");
        catalog.add(Product::new("Yacht", "Boats", MAX_PRICE).expect("valid product")).expect("add");
        assert_eq!(catalog.total_price(), MAX_PRICE + Decimal::new(100, 2));
    }

    #[test]
    fn from_products_rejects_duplicates() {
        let error = Catalog::from_products([product("Mug", "Kitchen", 100), product("mug", "KITCHEN", 200)])
            .expect_err("duplicate");

        assert!(matches!(error, DomainError::DuplicateKey { .. }));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("products.json");
        let catalog = Catalog::from_products([
            product("Lamp", "Home", 999),
            product("Pen", "Office", 150),
            product("Cup", "Kitchen", 150),
        ])
        .expect("distinct products");

        catalog.save(&path).expect("save");
        let mut reloaded = Catalog::new();
        let outcome = reloaded.load(&path).expect("load");

        assert_eq!(outcome, LoadOutcome::Loaded { count: 3 });
        assert_eq!(reloaded, catalog);
        assert_eq!(prices(&reloaded, None), prices(&catalog, None));
    }

    #[test]
    fn load_of_missing_file_is_not_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let mut catalog = Catalog::new();

        let outcome = catalog.load(dir.path().join("products.json")).expect("missing file is fine");

        assert_eq!(outcome, LoadOutcome::NotFound);
        assert!(catalog.is_empty());
    }

    #[test]
    fn corrupted_file_keeps_prior_products_and_catalog_stays_usable() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("products.json");
        fs::write(&path, "not json at all").expect("write fixture");

        let mut catalog = Catalog::from_products([product("Mug", "Kitchen", 100)]).expect("catalog");
        let error = catalog.load(&path).expect_err("corrupt file");

        assert!(matches!(error, PersistenceError::Parse { .. }));
        assert_eq!(catalog.len(), 1);
        catalog.add(product("Lamp", "Home", 999)).expect("still usable");
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn load_from_store_replaces_products() {
        let store = InMemoryStore::with_products(vec![product("Pan", "Kitchen", 2500)]);
        let mut catalog = Catalog::from_products([product("Mug", "Kitchen", 100)]).expect("catalog");

        let outcome = catalog.load_from(&store).expect("load");

        assert_eq!(outcome, LoadOutcome::Loaded { count: 1 });
        assert_eq!(catalog.products(), &[product("Pan", "Kitchen", 2500)]);

        catalog.add(product("Mug", "Kitchen", 100)).expect("add");
        catalog.save_to(&store).expect("save");
        let saved = store.load().expect("load").expect("saved products");
        assert_eq!(saved.len(), 2);
    }

    #[test]
    fn load_from_store_with_duplicate_keys_fails_and_keeps_products() {
        let store =
            InMemoryStore::with_products(vec![product("Mug", "Kitchen", 100), product("MUG", "kitchen", 200)]);
        let mut catalog = Catalog::from_products([product("Pan", "Kitchen", 2500)]).expect("catalog");

        let error = catalog.load_from(&store).expect_err("duplicate keys must fail the load");

        assert!(matches!(error, PersistenceError::InvalidStore { reason: DomainError::DuplicateKey { .. } }));
        assert_eq!(error.path(), None);
        assert_eq!(catalog.products(), &[product("Pan", "Kitchen", 2500)]);
    }
}
