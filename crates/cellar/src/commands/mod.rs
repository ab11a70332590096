//! CLI command implementations

pub mod config;
pub mod env;
pub mod resolve;
pub mod token;
pub mod version;

use anyhow::{anyhow, Context, Result};
use camino::Utf8Path;
use cellar_core::types::RuntimeConfig;
use cellar_core::HierarchicalConfigLoader;
use cellar_secrets::{resolver_from_config, BatchResolver, SecretCache, SecureString};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::cli::OutputFormat;
use crate::output;

const REDACTED: &str = "[REDACTED]";

/// Load the effective runtime configuration
pub fn load_config(explicit: Option<&Utf8Path>) -> Result<RuntimeConfig> {
    HierarchicalConfigLoader::new()
        .and_then(|loader| loader.load_runtime_config(explicit))
        .context("Failed to load configuration")
}

/// Resolver for commands that cannot work without the vault
pub fn vault_resolver(
    config: &RuntimeConfig,
    cache: Arc<dyn SecretCache>,
) -> Result<BatchResolver> {
    if !config.vault.enabled {
        return Err(anyhow!(
            "Vault lookups are disabled. \
             Set CELLAR_USE_VAULT=true or vault.enabled in the config file."
        ));
    }
    resolver_from_config(config, cache)
}

/// Print name/value pairs in the requested format
pub fn print_values<'a>(
    values: impl IntoIterator<Item = (&'a str, &'a SecureString)>,
    format: OutputFormat,
    show_values: bool,
) -> Result<()> {
    let values: Vec<_> = values.into_iter().collect();

    if format == OutputFormat::Table {
        output::header(&format!("{} secret(s)", values.len()));
        for (name, value) in values {
            output::kv(name, if show_values { value.as_str() } else { REDACTED });
        }
        return Ok(());
    }

    println!("{}", render(&values, format)?);
    Ok(())
}

/// Render values for machine consumption. Always includes the values.
pub fn render(values: &[(&str, &SecureString)], format: OutputFormat) -> Result<String> {
    let lines: Vec<String> = match format {
        OutputFormat::Json => {
            let map: BTreeMap<&str, &str> = values
                .iter()
                .map(|(name, value)| (*name, value.as_str()))
                .collect();
            return Ok(serde_json::to_string_pretty(&map)?);
        }
        OutputFormat::Dotenv => values
            .iter()
            .map(|(name, value)| format!("{}=\"{}\"", name, dotenv_escape(value.as_str())))
            .collect(),
        OutputFormat::Export => values
            .iter()
            .map(|(name, value)| {
                let quoted = value.as_str().replace('\'', r"'\''");
                format!("export {}='{}'", name, quoted)
            })
            .collect(),
        OutputFormat::Table => values
            .iter()
            .map(|(name, _)| format!("{}: {}", name, REDACTED))
            .collect(),
    };
    Ok(lines.join("\n"))
}

fn dotenv_escape(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', "\\\"")
        .replace('\n', r"\n")
}
