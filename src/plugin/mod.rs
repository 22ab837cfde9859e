//! Bundler plugin adapter for replace-code.
//!
//! This module handles:
//! - The transform hook interface a host bundler calls per file
//! - The replace plugin and its factory functions

pub mod transform;

pub use transform::{
	PLUGIN_NAME, Plugin, ReplacePlugin, TransformOutput, TransformResult, replace_code_plugin,
	replace_code_plugin_from_value,
};
