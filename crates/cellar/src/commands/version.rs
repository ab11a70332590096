//! Version command

use anyhow::Result;
use serde::Serialize;

use crate::cli::VersionArgs;

/// Build metadata; commit and target come from the release pipeline's env
#[derive(Debug, Serialize)]
struct BuildInfo {
    name: &'static str,
    version: &'static str,
    commit: Option<&'static str>,
    target: Option<&'static str>,
}

impl BuildInfo {
    fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            commit: option_env!("GIT_SHA"),
            target: option_env!("TARGET"),
        }
    }

    fn summary(&self) -> String {
        let mut line = format!("{} {}", self.name, self.version);
        if let Some(commit) = self.commit {
            line.push_str(&format!(" ({})", commit));
        }
        if let Some(target) = self.target {
            line.push(' ');
            line.push_str(target);
        }
        line
    }
}

pub fn run(args: VersionArgs) -> Result<()> {
    let info = BuildInfo::current();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{}", info.summary());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_starts_with_name_and_version() {
        let info = BuildInfo::current();
        assert!(info.summary().starts_with(&format!("cellar {}", info.version)));
    }

    #[test]
    fn test_summary_includes_commit_and_target() {
        let info = BuildInfo {
            name: "cellar",
            version: "1.2.3",
            commit: Some("abc1234"),
            target: Some("x86_64-unknown-linux-gnu"),
        };
        assert_eq!(info.summary(), "cellar 1.2.3 (abc1234) x86_64-unknown-linux-gnu");
    }

    #[test]
    fn test_json_has_version() {
        let json: serde_json::Value =
            serde_json::to_value(BuildInfo::current()).expect("should serialize");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(json["name"], "cellar");
    }
}
