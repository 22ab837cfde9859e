use crate::error::{Result, ReplaceError};
use crate::rules::MatchInfo;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::sync::Arc;

/// Caller-supplied replacement function, invoked once per replaced occurrence.
pub type ReplaceFn = Arc<dyn Fn(&MatchInfo<'_>) -> anyhow::Result<String> + Send + Sync>;

/// Plugin configuration.
///
/// Constructed once per build session and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct PluginConfig {
	/// Replacement rules, applied in order.
	pub replacements: Vec<Replacement>,

	/// Substrings of file ids that bypass replacement entirely.
	pub exclude: Option<Exclude>,

	/// Unrecognized keys, kept for host-specific extensions.
	pub extra: toml::Table,
}

impl PluginConfig {
	/// Create a configuration with the given replacements and no exclusions.
	pub fn new(replacements: Vec<Replacement>) -> Self {
		Self {
			replacements,
			..Default::default()
		}
	}

	/// Append a replacement rule.
	pub fn with_replacement(mut self, replacement: Replacement) -> Self {
		self.replacements.push(replacement);
		self
	}

	/// Set the exclusion option.
	pub fn with_exclude(mut self, exclude: impl Into<Exclude>) -> Self {
		self.exclude = Some(exclude.into());
		self
	}
}

impl<'de> Deserialize<'de> for PluginConfig {
	fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let value = Option::<toml::Value>::deserialize(deserializer)?;
		PluginConfig::from_value(value).map_err(serde::de::Error::custom)
	}
}

/// The `exclude` option: one substring or a list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclude {
	One(String),
	Many(Vec<String>),
}

impl Exclude {
	/// Read the option from a config value.
	pub fn from_toml(value: &toml::Value) -> Result<Self> {
		match value {
			toml::Value::String(s) => Ok(Exclude::One(s.clone())),
			toml::Value::Array(items) => items
				.iter()
				.map(|item| match item {
					toml::Value::String(s) => Ok(s.clone()),
					_ => Err(ReplaceError::ExcludeNotStringOrArray),
				})
				.collect::<Result<Vec<_>>>()
				.map(Exclude::Many),
			_ => Err(ReplaceError::ExcludeNotStringOrArray),
		}
	}
}

impl From<&str> for Exclude {
	fn from(value: &str) -> Self {
		Exclude::One(value.to_string())
	}
}

impl From<String> for Exclude {
	fn from(value: String) -> Self {
		Exclude::One(value)
	}
}

impl From<Vec<String>> for Exclude {
	fn from(value: Vec<String>) -> Self {
		Exclude::Many(value)
	}
}

/// A compiled matching pattern with its flags.
#[derive(Debug, Clone)]
pub struct Pattern {
	regex: Regex,
	source: String,
	flags: String,
	global: bool,
}

impl Pattern {
	/// Compile a pattern that replaces only its first match.
	pub fn new(source: &str) -> Result<Self> {
		Self::with_flags(source, "")
	}

	/// Compile a pattern with a flag string such as `"g"` or `"gi"`.
	///
	/// Supported flags: `g`, `i`, `m`, `s`, plus `u` and `d`, which are
	/// accepted and have no effect.
	pub fn with_flags(source: &str, flags: &str) -> Result<Self> {
		let mut builder = RegexBuilder::new(source);
		let mut global = false;
		let mut seen = String::with_capacity(flags.len());

		for flag in flags.chars() {
			if seen.contains(flag) {
				return Err(ReplaceError::InvalidPatternFlags {
					flags: flags.to_string(),
				});
			}
			seen.push(flag);

			match flag {
				'g' => global = true,
				'i' => {
					builder.case_insensitive(true);
				}
				'm' => {
					builder.multi_line(true);
				}
				's' => {
					builder.dot_matches_new_line(true);
				}
				'u' | 'd' => {}
				_ => {
					return Err(ReplaceError::InvalidPatternFlags {
						flags: flags.to_string(),
					});
				}
			}
		}

		let regex = builder
			.build()
			.map_err(|source_err| ReplaceError::InvalidRegex {
				pattern: source.to_string(),
				source: source_err,
			})?;

		Ok(Pattern {
			regex,
			source: source.to_string(),
			flags: flags.to_string(),
			global,
		})
	}

	/// The compiled regex.
	pub fn regex(&self) -> &Regex {
		&self.regex
	}

	/// The pattern source as written.
	pub fn source(&self) -> &str {
		&self.source
	}

	/// The flag string as written.
	pub fn flags(&self) -> &str {
		&self.flags
	}

	/// Whether every match is replaced rather than only the first.
	pub fn is_global(&self) -> bool {
		self.global
	}
}

impl fmt::Display for Pattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "/{}/{}", self.source, self.flags)
	}
}

/// A `from` or `to` value as it appeared in the configuration.
///
/// Values are kept loose until a file is transformed, so a malformed rule
/// only fails when it is reached.
#[derive(Clone)]
pub enum RuleValue {
	String(String),
	Pattern(Pattern),
	Function(ReplaceFn),
	/// Any other shape; `type_name` names what was found.
	Unsupported { type_name: &'static str },
}

impl RuleValue {
	/// Wrap a replacement function.
	pub fn function<F>(f: F) -> Self
	where
		F: Fn(&MatchInfo<'_>) -> anyhow::Result<String> + Send + Sync + 'static,
	{
		RuleValue::Function(Arc::new(f))
	}

	/// Placeholder for a key that was not present.
	pub fn missing() -> Self {
		RuleValue::Unsupported {
			type_name: "missing",
		}
	}

	/// Read a value from config.
	///
	/// Strings stay literal. A table with a string `pattern` key (and an
	/// optional string `flags` key) is compiled into a [`Pattern`].
	pub fn from_toml(value: &toml::Value) -> Result<Self> {
		match value {
			toml::Value::String(s) => Ok(RuleValue::String(s.clone())),
			toml::Value::Table(table) => {
				let Some(toml::Value::String(source)) = table.get("pattern") else {
					return Ok(RuleValue::Unsupported {
						type_name: value.type_str(),
					});
				};
				let flags = match table.get("flags") {
					None => "",
					Some(toml::Value::String(flags)) => flags.as_str(),
					Some(other) => {
						return Err(ReplaceError::InvalidPatternFlags {
							flags: other.to_string(),
						});
					}
				};
				Pattern::with_flags(source, flags).map(RuleValue::Pattern)
			}
			other => Ok(RuleValue::Unsupported {
				type_name: other.type_str(),
			}),
		}
	}

	/// Read a `to` value from config without compiling anything.
	///
	/// Only strings are accepted; tables and every other shape become
	/// `Unsupported` and fail when a file reaches the rule.
	pub fn target_from_toml(value: &toml::Value) -> Self {
		match value {
			toml::Value::String(s) => RuleValue::String(s.clone()),
			other => RuleValue::Unsupported {
				type_name: other.type_str(),
			},
		}
	}

	/// Short name of the value's shape, for logging.
	pub fn type_name(&self) -> &'static str {
		match self {
			RuleValue::String(_) => "string",
			RuleValue::Pattern(_) => "pattern",
			RuleValue::Function(_) => "function",
			RuleValue::Unsupported { type_name } => type_name,
		}
	}
}

impl fmt::Debug for RuleValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RuleValue::String(s) => f.debug_tuple("String").field(s).finish(),
			RuleValue::Pattern(p) => f.debug_tuple("Pattern").field(&p.to_string()).finish(),
			RuleValue::Function(_) => f.write_str("Function(..)"),
			RuleValue::Unsupported { type_name } => f
				.debug_struct("Unsupported")
				.field("type_name", type_name)
				.finish(),
		}
	}
}

impl From<&str> for RuleValue {
	fn from(value: &str) -> Self {
		RuleValue::String(value.to_string())
	}
}

impl From<String> for RuleValue {
	fn from(value: String) -> Self {
		RuleValue::String(value)
	}
}

impl From<Pattern> for RuleValue {
	fn from(value: Pattern) -> Self {
		RuleValue::Pattern(value)
	}
}

/// A single replacement rule.
#[derive(Debug, Clone)]
pub struct Replacement {
	/// What to match: a literal string or a pattern.
	pub from: RuleValue,

	/// What to insert: a template string or a function.
	pub to: RuleValue,
}

impl Replacement {
	/// Create a rule from any `from`/`to` values.
	pub fn new(from: impl Into<RuleValue>, to: impl Into<RuleValue>) -> Self {
		Replacement {
			from: from.into(),
			to: to.into(),
		}
	}

	/// Replace the first occurrence of a literal string.
	pub fn literal(from: impl Into<String>, to: impl Into<String>) -> Self {
		Replacement {
			from: RuleValue::String(from.into()),
			to: RuleValue::String(to.into()),
		}
	}

	/// Replace pattern matches with a template string.
	pub fn pattern(from: Pattern, to: impl Into<String>) -> Self {
		Replacement {
			from: RuleValue::Pattern(from),
			to: RuleValue::String(to.into()),
		}
	}

	/// Replace matches with the output of a function.
	pub fn with_fn<F>(from: impl Into<RuleValue>, f: F) -> Self
	where
		F: Fn(&MatchInfo<'_>) -> anyhow::Result<String> + Send + Sync + 'static,
	{
		Replacement {
			from: from.into(),
			to: RuleValue::function(f),
		}
	}

	/// Read a rule from config. Anything other than a table yields a rule
	/// with neither `from` nor `to`.
	pub fn from_toml(value: &toml::Value) -> Result<Self> {
		let toml::Value::Table(table) = value else {
			return Ok(Replacement {
				from: RuleValue::missing(),
				to: RuleValue::missing(),
			});
		};

		let from = table
			.get("from")
			.map(RuleValue::from_toml)
			.transpose()?
			.unwrap_or_else(RuleValue::missing);
		let to = table
			.get("to")
			.map(RuleValue::target_from_toml)
			.unwrap_or_else(RuleValue::missing);

		Ok(Replacement { from, to })
	}
}
