use crate::config::types::{Exclude, PluginConfig, Replacement};
use crate::error::{Result, ReplaceError};
use std::path::Path;

impl PluginConfig {
	/// Validate a raw configuration value.
	///
	/// `None` yields the default (empty) configuration. Individual rules are
	/// not checked here; see [`crate::rules::apply_replacements`].
	pub fn from_value(value: Option<toml::Value>) -> Result<Self> {
		let Some(value) = value else {
			return Ok(PluginConfig::default());
		};

		let toml::Value::Table(mut table) = value else {
			return Err(ReplaceError::ConfigNotObject);
		};

		let replacements = match table.remove("replacements") {
			Some(toml::Value::Array(items)) => items
				.iter()
				.map(Replacement::from_toml)
				.collect::<Result<Vec<_>>>()?,
			_ => return Err(ReplaceError::ReplacementsNotArray),
		};

		let exclude = table
			.remove("exclude")
			.map(|value| Exclude::from_toml(&value))
			.transpose()?;

		Ok(PluginConfig {
			replacements,
			exclude,
			extra: table,
		})
	}
}

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<PluginConfig> {
	let content = std::fs::read_to_string(path).map_err(|source| ReplaceError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_config_str(&content, path)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<PluginConfig> {
	let table: toml::Table =
		toml::from_str(content).map_err(|source| ReplaceError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		})?;

	PluginConfig::from_value(Some(toml::Value::Table(table)))
}
