//! Token command

use anyhow::{Context, Result};
use camino::Utf8Path;
use cellar_secrets::{SecretCache, SecretId};
use std::sync::Arc;

use crate::cli::TokenArgs;
use crate::output;

pub async fn run(
    args: TokenArgs,
    config: Option<&Utf8Path>,
    cache: Arc<dyn SecretCache>,
) -> Result<()> {
    let config = super::load_config(config)?;
    let resolver = super::vault_resolver(&config, cache)?;
    let id = SecretId::new(args.id);

    let spinner = output::spinner(&format!("Fetching {}...", id));
    let result = resolver.fetch_service_token(&id).await;
    spinner.finish_and_clear();
    let token = result.with_context(|| format!("Failed to fetch secret {}", id))?;

    if args.show_value {
        println!("{}", token.as_str());
    } else {
        output::success(&format!("Fetched {}", id));
        output::kv("value", &format!("{:?}", token));
    }

    Ok(())
}
