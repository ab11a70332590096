//! # cellar-core
//!
//! Core library for Cellar providing:
//! - Runtime configuration types (vault endpoint, network, retry policy)
//! - Hierarchical configuration loading (defaults, files, `CELLAR_*` env)
//! - Retry execution engine with policy-based configuration

pub mod config;
pub mod error;
pub mod retry;
pub mod types;

pub use config::HierarchicalConfigLoader;
pub use error::{Error, Result};
