//! Env command

use anyhow::{anyhow, Context, Result};
use camino::Utf8Path;
use cellar_secrets::{EnvLoader, SecretCache};
use std::sync::Arc;
use tracing::debug;

use crate::cli::EnvArgs;
use crate::output;

pub async fn run(
    args: EnvArgs,
    config: Option<&Utf8Path>,
    cache: Arc<dyn SecretCache>,
) -> Result<()> {
    if args.plain.is_empty() && args.secret.is_empty() {
        return Err(anyhow!("No variables requested. Use --plain KEY or --secret KEY."));
    }

    let config = super::load_config(config)?;
    let resolver = if config.vault.enabled && !args.secret.is_empty() {
        Some(super::vault_resolver(&config, cache)?)
    } else {
        debug!("Vault lookups disabled; secret variables are read verbatim");
        None
    };

    let loader = EnvLoader::new(args.plain, args.secret).with_resolver(resolver);

    let spinner = output::spinner("Loading environment...");
    let result = loader.load().await;
    spinner.finish_and_clear();
    let values = result.context("Failed to load environment")?;

    super::print_values(
        values.iter().map(|(key, value)| (key.as_str(), value)),
        args.format,
        args.show_values,
    )
}
