use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::errors::ValidationError;

/// Largest accepted price. Keeps any realistic catalog total far below `Decimal::MAX`.
pub const MAX_PRICE: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0); // 1_000_000_000_000

/// Case-insensitive identity of a product: `(name, category)` folded to lowercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProductKey {
    name: String,
    category: String,
}

impl ProductKey {
    pub fn new(name: &str, category: &str) -> Self {
        Self { name: fold(name), category: fold(category) }
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.category)
    }
}

/// A catalog entry. Immutable once built; construct through [`Product::new`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Product {
    name: String,
    category: String,
    price: Decimal,
}

impl Product {
    pub fn new(
        name: impl AsRef<str>,
        category: impl AsRef<str>,
        price: Decimal,
    ) -> Result<Self, ValidationError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(ValidationError::BlankName);
        }

        let category = category.as_ref().trim();
        if category.is_empty() {
            return Err(ValidationError::BlankCategory);
        }

        check_price_range(price)?;

        Ok(Self { name: name.to_string(), category: category.to_string(), price })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn key(&self) -> ProductKey {
        ProductKey::new(&self.name, &self.category)
    }

    /// True when `term` occurs in the name or the category, ignoring case.
    /// The term is used as given; only the empty term never matches.
    pub fn matches(&self, term: &str) -> bool {
        if term.is_empty() {
            return false;
        }

        let needle = fold(term);
        fold(&self.name).contains(&needle) || fold(&self.category).contains(&needle)
    }
}

/// Parses operator input such as `9.99` or ` 20 ` into a price.
pub fn parse_price(input: &str) -> Result<Decimal, ValidationError> {
    let trimmed = input.trim();
    let price = Decimal::from_str(trimmed)
        .map_err(|_| ValidationError::UnparsablePrice(trimmed.to_string()))?;

    check_price_range(price)?;
    Ok(price)
}

fn check_price_range(price: Decimal) -> Result<(), ValidationError> {
    if price < Decimal::ZERO {
        return Err(ValidationError::NegativePrice(price));
    }
    if price > MAX_PRICE {
        return Err(ValidationError::PriceTooLarge { price, max: MAX_PRICE });
    }
    Ok(())
}

fn fold(value: &str) -> String {
    value.to_lowercase()
}
