use std::cell::RefCell;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::Product;
use crate::errors::{DomainError, PersistenceError};

pub const DEFAULT_PRODUCT_FILE: &str = "products.json";

/// Storage seam for the catalog. `load` returns `None` when nothing has been stored yet.
pub trait ProductStore {
    fn load(&self) -> Result<Option<Vec<Product>>, PersistenceError>;
    fn save(&self, products: &[Product]) -> Result<(), PersistenceError>;
}

/// On-disk record. Older files used `ProductName`/`Category`/`Price` keys.
#[derive(Debug, Serialize, Deserialize)]
struct ProductRecord {
    #[serde(alias = "ProductName")]
    name: String,
    #[serde(alias = "Category")]
    category: String,
    #[serde(alias = "Price", with = "rust_decimal::serde::arbitrary_precision")]
    price: Decimal,
}

impl From<&Product> for ProductRecord {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name().to_string(),
            category: product.category().to_string(),
            price: product.price(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_PRODUCT_FILE.to_string());
        self.path.with_file_name(format!(".{file_name}.tmp"))
    }

    fn decode(&self, raw: &str) -> Result<Vec<Product>, PersistenceError> {
        let records: Vec<ProductRecord> = serde_json::from_str(raw)
            .map_err(|source| PersistenceError::Parse { path: self.path.clone(), source })?;

        let mut seen = HashSet::with_capacity(records.len());
        let mut products = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let invalid = |reason: DomainError| PersistenceError::InvalidRecord {
                path: self.path.clone(),
                index,
                reason,
            };

            let product = Product::new(&record.name, &record.category, record.price)
                .map_err(|error| invalid(error.into()))?;
            if !seen.insert(product.key()) {
                return Err(invalid(DomainError::DuplicateKey {
                    name: product.name().to_string(),
                    category: product.category().to_string(),
                }));
            }
            products.push(product);
        }

        Ok(products)
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_PRODUCT_FILE)
    }
}

impl ProductStore for JsonFileStore {
    fn load(&self) -> Result<Option<Vec<Product>>, PersistenceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(PersistenceError::Read { path: self.path.clone(), source }),
        };

        self.decode(&raw).map(Some)
    }

    /// Writes a temp sibling, syncs it, then renames it over the target.
    fn save(&self, products: &[Product]) -> Result<(), PersistenceError> {
        let records: Vec<ProductRecord> = products.iter().map(ProductRecord::from).collect();
        let json = serde_json::to_string_pretty(&records)
            .map_err(|source| PersistenceError::Serialize { path: self.path.clone(), source })?;

        let temp_path = self.temp_path();
        let write_err = |source| PersistenceError::Write { path: self.path.clone(), source };

        let mut file = File::create(&temp_path).map_err(write_err)?;
        file.write_all(json.as_bytes()).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        drop(file);

        if let Err(source) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(write_err(source));
        }

        Ok(())
    }
}

/// Keeps saved products in memory; useful for embedding and tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    products: RefCell<Option<Vec<Product>>>,
}

impl InMemoryStore {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self { products: RefCell::new(Some(products)) }
    }
}

impl ProductStore for InMemoryStore {
    fn load(&self) -> Result<Option<Vec<Product>>, PersistenceError> {
        Ok(self.products.borrow().clone())
    }

    fn save(&self, products: &[Product]) -> Result<(), PersistenceError> {
        *self.products.borrow_mut() = Some(products.to_vec());
        Ok(())
    }
}
