use std::io::{self, BufRead, Write};
use std::path::Path;

use shelf_core::{parse_price, Catalog, DomainError, LoadOutcome, Product};
use tracing::debug;

use crate::prompt::{is_quit_token, Prompter};
use crate::render::Renderer;

/// Interactive flow: load, add products until the operator stops, optionally search,
/// optionally save. Load and save failures are reported and the session carries on.
pub fn run<R: BufRead, W: Write>(
    path: &Path,
    renderer: &Renderer,
    input: R,
    output: W,
) -> io::Result<()> {
    let mut prompter = Prompter::new(input, output);
    let mut catalog = Catalog::new();

    match catalog.load(path) {
        Ok(LoadOutcome::Loaded { count }) => {
            prompter.say(&format!("Loaded {count} product(s) from {}.", path.display()))?
        }
        Ok(LoadOutcome::NotFound) => {
            prompter.say("No previous product data found. Starting with an empty list.")?
        }
        Err(error) => prompter.say(&renderer.error("Error loading products", &error.to_string()))?,
    }

    loop {
        add_products(&mut catalog, renderer, &mut prompter)?;

        prompter.say("")?;
        prompter.say_all(&renderer.listing(&catalog.list_sorted_by_price(None)))?;

        let question = format!("\nDo you want to add more products? {}:", renderer.accent("(y/n)"));
        if !prompter.confirm(&question)? {
            break;
        }
    }

    perform_search(&catalog, renderer, &mut prompter)?;

    let question = format!("\nDo you want to save the product list? {}:", renderer.accent("(y/n)"));
    if prompter.confirm(&question)? {
        match catalog.save(path) {
            Ok(()) => prompter.say("Products successfully saved to file.")?,
            Err(error) => {
                prompter.say(&renderer.error("Error saving products", &error.to_string()))?
            }
        }
    }

    Ok(())
}

/// Reads products until a quit token or end of input. Invalid entries restart the entry.
fn add_products<R: BufRead, W: Write>(
    catalog: &mut Catalog,
    renderer: &Renderer,
    prompter: &mut Prompter<R, W>,
) -> io::Result<()> {
    loop {
        prompter.say(&format!("\nEnter product details or type {} to quit:", renderer.accent("'q'")))?;

        let Some(name) = prompter.ask("Product name: ")? else {
            return Ok(());
        };
        if name.trim().is_empty() {
            prompter.say("Product name cannot be empty. Please enter a valid product name.")?;
            continue;
        }
        if is_quit_token(&name) {
            return Ok(());
        }

        let Some(category) = prompter.ask("Category: ")? else {
            return Ok(());
        };
        if category.trim().is_empty() {
            prompter.say("Category cannot be empty. Please enter a valid category.")?;
            continue;
        }

        let Some(price_input) = prompter.ask("Price: ")? else {
            return Ok(());
        };
        let product = match parse_price(&price_input)
            .and_then(|price| Product::new(&name, &category, price))
        {
            Ok(product) => product,
            Err(error) => {
                debug!(event_name = "cli.session.invalid_input", error = %error, "re-prompting");
                prompter.say(&format!("Invalid input ({error}), please try again."))?;
                continue;
            }
        };

        match catalog.add(product) {
            Ok(()) => prompter.say("Product added successfully!")?,
            Err(DomainError::DuplicateKey { name, category }) => {
                prompter.say(&renderer.duplicate(&name, &category))?
            }
            Err(DomainError::Validation(error)) => {
                prompter.say(&format!("Invalid input ({error}), please try again."))?
            }
        }
    }
}

fn perform_search<R: BufRead, W: Write>(
    catalog: &Catalog,
    renderer: &Renderer,
    prompter: &mut Prompter<R, W>,
) -> io::Result<()> {
    let question = format!("\nWould you like to search for a product? {}:", renderer.accent("(y/n)"));
    if !prompter.confirm(&question)? {
        return Ok(());
    }

    let Some(term) = prompter.ask("Enter search term (product name or category): ")? else {
        return Ok(());
    };
    let term = term.trim();
    if term.is_empty() {
        return Ok(());
    }

    let found = catalog.search(term);
    if found.is_empty() {
        return prompter.say(&renderer.not_found(term));
    }

    prompter.say("")?;
    prompter.say(&renderer.found(found.len(), term))?;
    prompter.say_all(&renderer.listing(&catalog.list_sorted_by_price(Some(term))))
}
