pub mod commands;
pub mod logging;
pub mod prompt;
pub mod render;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_core::config::{AppConfig, ConfigOverrides, LoadOptions};

use crate::commands::{CommandResult, EXIT_CONFIG, EXIT_FAILURE};
use crate::render::Renderer;

#[derive(Debug, Parser)]
#[command(
    name = "shelf",
    about = "Shelf product catalog",
    long_about = "Keep a small catalog of products (name, category, price): add with duplicate detection, list by price, search, and save to JSON.",
    after_help = "Examples:\n  shelf\n  shelf list --highlight shoe\n  shelf add \"Running Shoe\" Shoes 49.99\n  shelf search shoe --json"
)]
pub struct Cli {
    #[arg(long, global = true, value_name = "PATH", help = "Product file to read and write")]
    file: Option<PathBuf>,
    #[arg(long, global = true, value_name = "PATH", help = "Config file (must exist when given)")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Disable colored output")]
    no_color: bool,
    #[arg(long, global = true, value_name = "LEVEL", help = "Log level written to stderr")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Add products interactively, then optionally search and save (default)")]
    Session,
    #[command(about = "List all products sorted by price with the total")]
    List {
        #[arg(long, value_name = "TERM", help = "Mark products whose name or category contains TERM")]
        highlight: Option<String>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "List products whose name or category contains TERM")]
    Search {
        term: String,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Add one product and save the catalog")]
    Add {
        name: String,
        category: String,
        #[arg(allow_negative_numbers = true)]
        price: String,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                storage_path: self.file.clone(),
                color: self.no_color.then_some(false),
                log_level: self.log_level.clone(),
            },
        }
    }

    fn flag_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.file.is_some() {
            keys.push("storage.path");
        }
        if self.no_color {
            keys.push("display.color");
        }
        if self.log_level.is_some() {
            keys.push("logging.level");
        }
        keys
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let stdin = io::stdin();
    let code = execute(cli, stdin.lock(), io::stdout());
    ExitCode::from(code)
}

/// Runs a parsed command line against the given input and output. Returns the exit code.
pub fn execute<R: BufRead, W: Write>(cli: Cli, input: R, mut output: W) -> u8 {
    let config = match AppConfig::load(cli.load_options()) {
        Ok(config) => config,
        Err(error) => {
            let _ = writeln!(output, "configuration error: {error}");
            return EXIT_CONFIG;
        }
    };

    logging::init_logging(&config.logging);
    if !config.display.color {
        colored::control::set_override(false);
    }

    match dispatch(&cli, &config, input, &mut output) {
        Ok(code) => code,
        Err(error) => {
            tracing::error!(event_name = "cli.command.failed", error = %format!("{error:#}"), "command failed");
            let _ = writeln!(output, "error: {error:#}");
            EXIT_FAILURE
        }
    }
}

fn dispatch<R: BufRead, W: Write>(
    cli: &Cli,
    config: &AppConfig,
    input: R,
    output: &mut W,
) -> anyhow::Result<u8> {
    let renderer = Renderer::new(&config.display);
    let path = config.storage.path.as_path();

    let result = match &cli.command {
        None | Some(Command::Session) => {
            commands::session::run(path, &renderer, input, &mut *output)
                .context("interactive session failed")?;
            return Ok(commands::EXIT_OK);
        }
        Some(Command::List { highlight, json }) => {
            commands::list::run(path, &renderer, highlight.as_deref(), *json)
        }
        Some(Command::Search { term, json }) => commands::search::run(path, &renderer, term, *json),
        Some(Command::Add { name, category, price }) => {
            commands::add::run(path, &renderer, name, category, price)
        }
        Some(Command::Config) => commands::config::run(config, cli.config.as_deref(), &cli.flag_keys()),
    };

    write_result(output, &result)?;
    Ok(result.exit_code)
}

fn write_result<W: Write>(output: &mut W, result: &CommandResult) -> anyhow::Result<()> {
    writeln!(output, "{}", result.output).context("failed to write command output")?;
    output.flush().context("failed to flush command output")
}
