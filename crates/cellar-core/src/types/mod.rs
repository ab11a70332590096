//! Type definitions for Cellar configuration

mod runtime_config;

pub use runtime_config::*;
