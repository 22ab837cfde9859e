//! Configuration types and loading for replace-code.
//!
//! This module handles:
//! - Typed plugin configuration and replacement rules
//! - Shape validation of raw configuration values
//! - TOML config file parsing

pub mod parser;
pub mod types;

pub use parser::{parse_config_file, parse_config_str};
pub use types::{Exclude, Pattern, PluginConfig, ReplaceFn, Replacement, RuleValue};
