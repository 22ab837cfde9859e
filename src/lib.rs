//! replace-code - bundler transform plugin for literal and pattern-based replacement.
//!
//! This library provides:
//! - Plugin configuration types, validation and TOML loading
//! - Substring-based exclusion of file ids
//! - Sequential literal and pattern replacement with template expansion
//! - A transform hook adapter for the host bundler
//!
//! # Example
//!
//! ```
//! use replace_code::config::{Pattern, PluginConfig, Replacement};
//! use replace_code::plugin::{Plugin, replace_code_plugin};
//!
//! let config = PluginConfig::new(vec![
//!     Replacement::literal("__CLI_NAME__", "replace-code"),
//!     Replacement::pattern(Pattern::with_flags("__CLI_VERSION__", "g").unwrap(), "0.1.2"),
//! ])
//! .with_exclude("node_modules");
//!
//! let plugin = replace_code_plugin(Some(config));
//!
//! let output = plugin
//!     .transform("__CLI_NAME__ v__CLI_VERSION__", "/src/cli.ts")
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(output.code, "replace-code v0.1.2");
//! assert!(output.map.is_none());
//!
//! assert!(plugin.transform("__CLI_NAME__", "/node_modules/x.js").unwrap().is_none());
//! ```

pub mod config;
pub mod error;
pub mod plugin;
pub mod rules;

pub use error::{ERROR_PREFIX, ReplaceError, Result};
pub use plugin::{Plugin, ReplacePlugin, replace_code_plugin};
