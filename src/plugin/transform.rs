use crate::config::types::{PluginConfig, Replacement};
use crate::error::Result;
use crate::rules::{ExclusionPatternSet, apply_replacements};
use std::borrow::Cow;
use tracing::debug;

/// Name reported by [`ReplacePlugin::name`].
pub const PLUGIN_NAME: &str = "transform-file";

/// Rewritten file content returned from a transform hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
	/// The transformed source text.
	pub code: String,

	/// Source map for the transform. Always `None`: hosts that need an
	/// accurate map must recompute it.
	pub map: Option<String>,
}

/// `Ok(None)` tells the host to keep the original content.
pub type TransformResult = Result<Option<TransformOutput>>;

/// A plugin participating in the host bundler's transform pipeline.
pub trait Plugin: Send + Sync {
	/// Returns the plugin name for debugging and logging
	fn name(&self) -> Cow<'static, str>;

	/// Called once per file with its content and id.
	fn transform(&self, code: &str, id: &str) -> TransformResult;
}

/// Plugin that applies configured replacements to every non-excluded file.
///
/// # Architecture
///
/// ```text
/// (code, id) → exclusion check → replacements in order → { code, map: None }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReplacePlugin {
	config: PluginConfig,
	exclude: ExclusionPatternSet,
}

impl ReplacePlugin {
	/// Create the plugin from an already validated configuration.
	pub fn new(config: PluginConfig) -> Self {
		let exclude = ExclusionPatternSet::from_option(config.exclude.as_ref());
		debug!(
			"[{}] Created with {} replacements, {} exclude patterns",
			PLUGIN_NAME,
			config.replacements.len(),
			exclude.len()
		);
		ReplacePlugin { config, exclude }
	}

	/// The configuration the plugin was built from.
	pub fn config(&self) -> &PluginConfig {
		&self.config
	}

	/// Replacement rules, in application order.
	pub fn replacements(&self) -> &[Replacement] {
		&self.config.replacements
	}

	/// Exclusion patterns built at construction.
	pub fn exclusions(&self) -> &ExclusionPatternSet {
		&self.exclude
	}
}

impl Plugin for ReplacePlugin {
	fn name(&self) -> Cow<'static, str> {
		PLUGIN_NAME.into()
	}

	/// Transform hook.
	///
	/// # Returns
	///
	/// - `Ok(Some(output))` - Replacements applied (possibly with no change)
	/// - `Ok(None)` - File id matched an exclude pattern
	/// - `Err(e)` - A rule was malformed or a replacement function failed
	fn transform(&self, code: &str, id: &str) -> TransformResult {
		if self.exclude.is_excluded(id) {
			debug!("[{}] Skipping excluded file: {}", PLUGIN_NAME, id);
			return Ok(None);
		}

		let code = apply_replacements(code, &self.config.replacements)?;
		debug!("[{}] Transformed {} ({} bytes)", PLUGIN_NAME, id, code.len());

		Ok(Some(TransformOutput { code, map: None }))
	}
}

/// Create the replace plugin. `None` behaves like an empty replacement list.
pub fn replace_code_plugin(config: Option<PluginConfig>) -> ReplacePlugin {
	ReplacePlugin::new(config.unwrap_or_default())
}

/// Validate a raw configuration value and create the replace plugin.
pub fn replace_code_plugin_from_value(value: Option<toml::Value>) -> Result<ReplacePlugin> {
	PluginConfig::from_value(value).map(ReplacePlugin::new)
}
