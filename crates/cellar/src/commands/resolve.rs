//! Resolve command

use anyhow::{anyhow, Context, Result};
use camino::Utf8Path;
use cellar_secrets::{SecretCache, SecretRequest};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::cli::ResolveArgs;
use crate::output;

pub async fn run(
    args: ResolveArgs,
    config: Option<&Utf8Path>,
    cache: Arc<dyn SecretCache>,
) -> Result<()> {
    let request = build_request(args.file.as_deref(), &args.secrets)?;
    if request.is_empty() {
        return Err(anyhow!("No secrets requested. Use --file or --secret NAME=ID."));
    }

    let config = super::load_config(config)?;
    let resolver = super::vault_resolver(&config, cache)?;

    let spinner = output::spinner(&format!("Resolving {} secret(s)...", request.len()));
    let result = resolver.resolve(&request).await;
    spinner.finish_and_clear();
    let resolved = result.context("Failed to resolve secrets")?;

    super::print_values(resolved.iter(), args.format, args.show_values)
}

/// Merge the mapping file with `NAME=ID` flags; flags win on conflicts
fn build_request(file: Option<&Utf8Path>, pairs: &[String]) -> Result<SecretRequest> {
    let mut request: SecretRequest = match file {
        Some(path) => load_mapping(path)?.into_iter().collect(),
        None => SecretRequest::new(),
    };

    for pair in pairs {
        let (name, id) = parse_pair(pair)?;
        request.insert(name, id);
    }

    Ok(request)
}

fn parse_pair(pair: &str) -> Result<(&str, &str)> {
    match pair.split_once('=') {
        Some((name, id)) if !name.trim().is_empty() && !id.trim().is_empty() => {
            Ok((name.trim(), id.trim()))
        }
        _ => Err(anyhow!("Invalid secret mapping '{}', expected NAME=ID", pair)),
    }
}

/// Read a name → identifier mapping from YAML, or JSON by `.json` extension
fn load_mapping(path: &Utf8Path) -> Result<BTreeMap<String, String>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;

    if path.extension() == Some("json") {
        serde_json::from_str(&content).with_context(|| format!("Invalid JSON mapping in {}", path))
    } else {
        serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Invalid YAML mapping in {}", path))
    }
}
