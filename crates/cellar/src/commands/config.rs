//! Config command

use anyhow::Result;
use camino::Utf8Path;
use cellar_core::types::RuntimeConfig;

use crate::cli::{ConfigCommands, ConfigShowArgs};
use crate::output;

pub fn run(cmd: ConfigCommands, config: Option<&Utf8Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => show(args, config),
    }
}

fn show(args: ConfigShowArgs, explicit: Option<&Utf8Path>) -> Result<()> {
    let config = super::load_config(explicit)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        print!("{}", serde_yaml_ng::to_string(&config)?);
        output::info(&token_status(&config));
    }

    Ok(())
}

fn token_status(config: &RuntimeConfig) -> String {
    match &config.vault.token {
        Some(token) if !token.is_empty() => "Vault token: set (redacted)".to_string(),
        _ => "Vault token: not set (use CELLAR_TOKEN)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_config_omits_token() {
        let mut config = RuntimeConfig::default();
        config.vault.domain = "example.com".to_string();
        config.vault.token = Some("pts_secret".to_string());

        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!yaml.contains("pts_secret"));
        assert!(!json.contains("pts_secret"));
        assert!(yaml.contains("example.com"));
    }

    #[test]
    fn test_token_status() {
        let mut config = RuntimeConfig::default();
        assert!(token_status(&config).contains("not set"));

        config.vault.token = Some("pts_secret".to_string());
        let status = token_status(&config);
        assert!(status.contains("set (redacted)"));
        assert!(!status.contains("pts_secret"));
    }
}
