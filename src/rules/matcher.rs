use crate::config::types::Exclude;

/// Normalized `exclude` option: substrings checked against each file id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionPatternSet {
	patterns: Vec<String>,
}

impl ExclusionPatternSet {
	/// Build the set from the raw option.
	///
	/// An absent option or a single empty string excludes nothing. A list is
	/// used as-is, so an empty string inside a list matches every id.
	pub fn from_option(exclude: Option<&Exclude>) -> Self {
		let patterns = match exclude {
			None => Vec::new(),
			Some(Exclude::One(pattern)) if pattern.is_empty() => Vec::new(),
			Some(Exclude::One(pattern)) => vec![pattern.clone()],
			Some(Exclude::Many(patterns)) => patterns.clone(),
		};
		ExclusionPatternSet { patterns }
	}

	/// Check if a file id contains any of the patterns.
	pub fn is_excluded(&self, id: &str) -> bool {
		self.patterns
			.iter()
			.any(|pattern| id.contains(pattern.as_str()))
	}

	/// The normalized substrings, in configured order.
	pub fn patterns(&self) -> &[String] {
		&self.patterns
	}

	/// Number of patterns.
	pub fn len(&self) -> usize {
		self.patterns.len()
	}

	/// Whether no file can be excluded.
	pub fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}
}
