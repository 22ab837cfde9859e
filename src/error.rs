use std::path::PathBuf;

/// Prefix carried by every message this crate produces.
pub const ERROR_PREFIX: &str = "[replace-code]";

/// Library-level structured errors for replace-code.
///
/// Configuration errors surface when the plugin is constructed. Replacement
/// errors surface lazily, when a file reaches the offending rule.
#[derive(Debug, thiserror::Error)]
pub enum ReplaceError {
	#[error("[replace-code]: The configuration is not of type 'Object'.")]
	ConfigNotObject,

	#[error("[replace-code]: The configuration option 'replacements' is not of type 'Array'.")]
	ReplacementsNotArray,

	#[error("[replace-code]: The configuration option 'exclude' is not of type 'string' or 'Array'.")]
	ExcludeNotStringOrArray,

	#[error("[replace-code]: Invalid regex pattern in replacement: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("[replace-code]: Invalid pattern flags: {flags}")]
	InvalidPatternFlags { flags: String },

	#[error("[replace-code]: Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("[replace-code]: Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("[replace-code]: The replacement option 'from' is not of type 'string' or 'RegExp'.")]
	FromTypeError { index: usize },

	#[error("[replace-code]: The replacement option 'to' is not of type 'string' or 'Function'")]
	ToTypeError { index: usize },

	/// Error returned by a caller-supplied replacement function.
	#[error(transparent)]
	Callback(anyhow::Error),
}

impl ReplaceError {
	/// Whether this error describes the shape of the configuration itself.
	pub fn is_configuration_error(&self) -> bool {
		matches!(
			self,
			ReplaceError::ConfigNotObject
				| ReplaceError::ReplacementsNotArray
				| ReplaceError::ExcludeNotStringOrArray
				| ReplaceError::InvalidRegex { .. }
				| ReplaceError::InvalidPatternFlags { .. }
				| ReplaceError::ConfigReadError { .. }
				| ReplaceError::ConfigParseError { .. }
		)
	}

	/// Whether this error describes a single malformed replacement rule.
	pub fn is_replacement_error(&self) -> bool {
		matches!(
			self,
			ReplaceError::FromTypeError { .. } | ReplaceError::ToTypeError { .. }
		)
	}
}

/// Result type alias using ReplaceError.
pub type Result<T> = std::result::Result<T, ReplaceError>;
