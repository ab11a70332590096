//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Cellar - resolve application secrets from a remote vault
#[derive(Parser, Debug)]
#[command(name = "cellar")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a cellar config file (overrides ~/.cellar/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version(VersionArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Resolve a set of named secrets in one batch
    Resolve(ResolveArgs),

    /// Fetch a single secret by identifier
    Token(TokenArgs),

    /// Load plain and vault-backed environment variables
    Env(EnvArgs),
}

/// How resolved values are printed
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned name/value table (values redacted unless --show-values)
    #[default]
    Table,
    /// JSON object of name to value
    Json,
    /// NAME="value" lines
    Dotenv,
    /// export NAME='value' lines for shell eval
    Export,
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Config commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration (token redacted)
    Show(ConfigShowArgs),
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Resolve command
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// YAML or JSON file mapping names to secret identifiers
    #[arg(short, long)]
    pub file: Option<Utf8PathBuf>,

    /// Additional NAME=ID mapping (repeatable)
    #[arg(short, long = "secret", value_name = "NAME=ID")]
    pub secrets: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Print secret values in table output
    #[arg(long)]
    pub show_values: bool,
}

// Token command
#[derive(Args, Debug)]
pub struct TokenArgs {
    /// Secret identifier
    pub id: String,

    /// Print the value instead of a redacted placeholder
    #[arg(long)]
    pub show_value: bool,
}

// Env command
#[derive(Args, Debug)]
pub struct EnvArgs {
    /// Variable read verbatim from the environment (repeatable)
    #[arg(long = "plain", value_name = "KEY")]
    pub plain: Vec<String>,

    /// Variable holding a vault identifier (repeatable)
    #[arg(long = "secret", value_name = "KEY")]
    pub secret: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Print secret values in table output
    #[arg(long)]
    pub show_values: bool,
}
