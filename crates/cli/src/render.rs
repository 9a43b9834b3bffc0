use colored::{Color, Colorize};
use rust_decimal::{Decimal, RoundingStrategy};
use shelf_core::config::DisplayConfig;
use shelf_core::{PriceListing, Product};

/// Turns catalog data into terminal lines. Color is optional so output can be piped.
#[derive(Clone, Debug)]
pub struct Renderer {
    color: bool,
    currency_symbol: String,
}

impl Renderer {
    pub fn new(display: &DisplayConfig) -> Self {
        Self { color: display.color, currency_symbol: display.currency_symbol.clone() }
    }

    pub fn plain(currency_symbol: impl Into<String>) -> Self {
        Self { color: false, currency_symbol: currency_symbol.into() }
    }

    pub fn price(&self, price: Decimal) -> String {
        let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{}{rounded:.2}", self.currency_symbol)
    }

    pub fn product_line(&self, product: &Product) -> String {
        format!(
            "Product name: {} Category: {} Price: {}",
            self.paint(product.name(), Color::Red),
            self.paint(product.category(), Color::Green),
            self.paint(&self.price(product.price()), Color::Yellow),
        )
    }

    /// Sorted list with a heading and total, or a single line for an empty catalog.
    pub fn listing(&self, listing: &PriceListing<'_>) -> Vec<String> {
        if listing.is_empty() {
            return vec!["No products added.".to_string()];
        }

        let mut lines = Vec::with_capacity(listing.entries.len() + 3);
        lines.push(format!("Products list {}:", self.paint("(sorted by price)", Color::Yellow)));

        for entry in &listing.entries {
            if entry.highlighted {
                let plain = format!(
                    "* Product name: {} Category: {} Price: {}",
                    entry.product.name(),
                    entry.product.category(),
                    self.price(entry.product.price())
                );
                lines.push(self.paint(&plain, Color::BrightYellow));
            } else {
                lines.push(self.product_line(entry.product));
            }
        }

        lines.push(String::new());
        lines.push(format!(
            "Total price of all products: {}",
            self.paint(&self.price(listing.total), Color::BrightYellow)
        ));
        lines
    }

    pub fn duplicate(&self, name: &str, category: &str) -> String {
        format!(
            "A product with the name '{}' and category '{}' already exists.",
            self.paint(name, Color::Red),
            self.paint(category, Color::Green)
        )
    }

    pub fn found(&self, count: usize, term: &str) -> String {
        format!(
            "Found {} product(s) matching '{}':",
            self.paint(&count.to_string(), Color::Red),
            self.paint(term, Color::Green)
        )
    }

    pub fn not_found(&self, term: &str) -> String {
        format!("No products found matching '{}'.", self.paint(term, Color::Green))
    }

    pub fn error(&self, context: &str, detail: &str) -> String {
        format!("{context}: {}", self.paint(detail, Color::BrightYellow))
    }

    pub fn accent(&self, text: &str) -> String {
        self.paint(text, Color::Red)
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }
}
