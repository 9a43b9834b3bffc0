use std::env;
use std::fs;
use std::path::Path;

use shelf_core::config::{resolve_config_path, AppConfig};
use toml::Value;

use super::CommandResult;

/// Effective configuration, one line per key with where the value came from.
/// `flag_keys` lists the keys set by command line flags.
pub fn run(config: &AppConfig, explicit_path: Option<&Path>, flag_keys: &[&str]) -> CommandResult {
    let config_file_path = resolve_config_path(explicit_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        if flag_keys.iter().any(|key| *key == key_path) {
            return "flag".to_string();
        }
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let lines = vec![
        "effective config (source precedence: flag > env > file > default):".to_string(),
        render_line(
            "storage.path",
            &config.storage.path.display().to_string(),
            source("storage.path", &["SHELF_STORAGE_PATH"]),
        ),
        render_line(
            "display.color",
            &config.display.color.to_string(),
            source("display.color", &["SHELF_DISPLAY_COLOR"]),
        ),
        render_line(
            "display.currency_symbol",
            &config.display.currency_symbol,
            source("display.currency_symbol", &["SHELF_DISPLAY_CURRENCY_SYMBOL"]),
        ),
        render_line(
            "logging.level",
            &config.logging.level,
            source("logging.level", &["SHELF_LOGGING_LEVEL", "SHELF_LOG_LEVEL"]),
        ),
        render_line(
            "logging.format",
            &format!("{:?}", config.logging.format).to_lowercase(),
            source("logging.format", &["SHELF_LOGGING_FORMAT", "SHELF_LOG_FORMAT"]),
        ),
    ];

    CommandResult::from_lines(lines)
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
