use crate::config::types::{Pattern, ReplaceFn, Replacement, RuleValue};
use crate::error::{Result, ReplaceError};
use crate::rules::expand::expand_template;
use regex::Captures;
use tracing::trace;

/// One occurrence being replaced, as seen by a template or a function.
#[derive(Debug, Clone)]
pub struct MatchInfo<'a> {
	/// The matched text.
	pub matched: &'a str,

	/// Capture groups 1..n; `None` for groups that did not participate.
	pub groups: Vec<Option<&'a str>>,

	/// Named capture groups, in pattern order.
	pub named: Vec<(&'a str, Option<&'a str>)>,

	/// Byte offset of the match in `input`.
	pub offset: usize,

	/// The full text being searched.
	pub input: &'a str,
}

impl<'a> MatchInfo<'a> {
	fn literal(input: &'a str, offset: usize, len: usize) -> Self {
		MatchInfo {
			matched: &input[offset..offset + len],
			groups: Vec::new(),
			named: Vec::new(),
			offset,
			input,
		}
	}

	fn from_captures(caps: &Captures<'a>, names: &[(usize, &'a str)], input: &'a str) -> Option<Self> {
		let whole = caps.get(0)?;
		let groups = (1..caps.len())
			.map(|i| caps.get(i).map(|m| m.as_str()))
			.collect();
		let named = names
			.iter()
			.map(|&(i, name)| (name, caps.get(i).map(|m| m.as_str())))
			.collect();

		Some(MatchInfo {
			matched: whole.as_str(),
			groups,
			named,
			offset: whole.start(),
			input,
		})
	}

	/// Look up a named group.
	pub fn name(&self, name: &str) -> Option<&'a str> {
		self.named
			.iter()
			.find(|(candidate, _)| *candidate == name)
			.and_then(|(_, value)| *value)
	}

	/// Text before the match.
	pub fn before(&self) -> &'a str {
		&self.input[..self.offset]
	}

	/// Text after the match.
	pub fn after(&self) -> &'a str {
		&self.input[self.offset + self.matched.len()..]
	}
}

/// Validated `from` of a rule.
#[derive(Debug, Clone, Copy)]
pub enum ReplacementSource<'a> {
	Literal(&'a str),
	Pattern(&'a Pattern),
}

/// Validated `to` of a rule.
#[derive(Clone, Copy)]
pub enum ReplacementTarget<'a> {
	Literal(&'a str),
	Function(&'a ReplaceFn),
}

impl std::fmt::Debug for ReplacementTarget<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ReplacementTarget::Literal(s) => f.debug_tuple("Literal").field(s).finish(),
			ReplacementTarget::Function(_) => f.write_str("Function(..)"),
		}
	}
}

impl Replacement {
	/// Validate `from`. `index` is the rule's position, reported on error.
	pub fn source(&self, index: usize) -> Result<ReplacementSource<'_>> {
		match &self.from {
			RuleValue::String(s) => Ok(ReplacementSource::Literal(s)),
			RuleValue::Pattern(p) => Ok(ReplacementSource::Pattern(p)),
			RuleValue::Function(_) | RuleValue::Unsupported { .. } => {
				Err(ReplaceError::FromTypeError { index })
			}
		}
	}

	/// Validate `to`. `index` is the rule's position, reported on error.
	pub fn target(&self, index: usize) -> Result<ReplacementTarget<'_>> {
		match &self.to {
			RuleValue::String(s) => Ok(ReplacementTarget::Literal(s)),
			RuleValue::Function(f) => Ok(ReplacementTarget::Function(f)),
			RuleValue::Pattern(_) | RuleValue::Unsupported { .. } => {
				Err(ReplaceError::ToTypeError { index })
			}
		}
	}
}

/// Apply one validated rule to a string.
pub fn replace(input: &str, source: ReplacementSource<'_>, target: ReplacementTarget<'_>) -> Result<String> {
	match source {
		ReplacementSource::Literal(needle) => replace_literal(input, needle, target),
		ReplacementSource::Pattern(pattern) => replace_pattern(input, pattern, target),
	}
}

/// Apply every rule in order, each one rewriting the previous one's output.
///
/// Stops at the first rule whose `from` or `to` is malformed, or whose
/// function returns an error.
pub fn apply_replacements(src: &str, replacements: &[Replacement]) -> Result<String> {
	let mut code = src.to_string();

	for (index, replacement) in replacements.iter().enumerate() {
		let source = replacement.source(index)?;
		let target = replacement.target(index)?;
		code = replace(&code, source, target)?;
		trace!(index, ?source, "applied replacement");
	}

	Ok(code)
}

fn replace_literal(input: &str, needle: &str, target: ReplacementTarget<'_>) -> Result<String> {
	let Some(offset) = input.find(needle) else {
		return Ok(input.to_string());
	};

	let info = MatchInfo::literal(input, offset, needle.len());
	let mut out = String::with_capacity(input.len());
	out.push_str(info.before());
	push_target(&mut out, target, &info)?;
	out.push_str(info.after());
	Ok(out)
}

fn replace_pattern(input: &str, pattern: &Pattern, target: ReplacementTarget<'_>) -> Result<String> {
	let regex = pattern.regex();
	let names: Vec<(usize, &str)> = regex
		.capture_names()
		.enumerate()
		.filter_map(|(i, name)| name.map(|name| (i, name)))
		.collect();

	let mut out = String::with_capacity(input.len());
	let mut last = 0;
	let mut pos = 0;

	// An empty match advances the search by one char, so an empty match
	// directly after a non-empty one is still replaced.
	while pos <= input.len() {
		let Some(caps) = regex.captures_at(input, pos) else {
			break;
		};
		let Some(info) = MatchInfo::from_captures(&caps, &names, input) else {
			break;
		};

		out.push_str(&input[last..info.offset]);
		push_target(&mut out, target, &info)?;
		last = info.offset + info.matched.len();

		if !pattern.is_global() {
			break;
		}

		pos = if info.matched.is_empty() {
			last + input[last..].chars().next().map_or(1, char::len_utf8)
		} else {
			last
		};
	}

	out.push_str(&input[last..]);
	Ok(out)
}

fn push_target(out: &mut String, target: ReplacementTarget<'_>, info: &MatchInfo<'_>) -> Result<()> {
	match target {
		ReplacementTarget::Literal(template) => expand_template(template, info, out),
		ReplacementTarget::Function(f) => out.push_str(&f(info).map_err(ReplaceError::Callback)?),
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	fn global(source: &str) -> Pattern {
		Pattern::with_flags(source, "g").unwrap()
	}

	#[test]
	fn test_literal_replaces_first_occurrence_only() {
		let rules = [Replacement::literal("foo", "bar")];
		assert_eq!(apply_replacements("foo foo foo", &rules).unwrap(), "bar foo foo");
	}

	#[test]
	fn test_literal_no_match_is_unchanged() {
		let rules = [Replacement::literal("missing", "x")];
		assert_eq!(apply_replacements("abc", &rules).unwrap(), "abc");
	}

	#[test]
	fn test_empty_literal_matches_at_start() {
		let rules = [Replacement::literal("", "x")];
		assert_eq!(apply_replacements("abc", &rules).unwrap(), "xabc");
	}

	#[test]
	fn test_literal_from_does_not_expand_group_references() {
		let rules = [Replacement::literal("b", "[$1|$&]")];
		assert_eq!(apply_replacements("abc", &rules).unwrap(), "a[$1|b]c");
	}

	#[test]
	fn test_pattern_first_match_vs_global() {
		let first = [Replacement::pattern(Pattern::new("a").unwrap(), "x")];
		assert_eq!(apply_replacements("aaa", &first).unwrap(), "xaa");

		let all = [Replacement::pattern(global("a"), "x")];
		assert_eq!(apply_replacements("aaa", &all).unwrap(), "xxx");
	}

	#[test]
	fn test_global_empty_match_after_match_is_replaced() {
		let rules = [Replacement::pattern(global("a*"), "-")];
		assert_eq!(apply_replacements("baaac", &rules).unwrap(), "-b--c-");
		assert_eq!(apply_replacements("", &rules).unwrap(), "-");
	}

	#[test]
	fn test_global_empty_match_steps_over_multibyte_chars() {
		let rules = [Replacement::pattern(global("x*"), "|")];
		assert_eq!(apply_replacements("éx", &rules).unwrap(), "|é||");
	}

	#[test]
	fn test_global_respects_anchors_after_first_match() {
		let rules = [Replacement::pattern(global("^a"), "x")];
		assert_eq!(apply_replacements("aaa", &rules).unwrap(), "xaa");
	}

	#[test]
	fn test_pattern_with_capture_groups() {
		let rules = [Replacement::pattern(global(r"(\w+)@(\w+)"), "$2 at $1")];
		assert_eq!(
			apply_replacements("alice@home bob@work", &rules).unwrap(),
			"home at alice work at bob"
		);
	}

	#[test]
	fn test_pattern_with_named_groups() {
		let rules = [Replacement::pattern(
			Pattern::new(r"(?<major>\d+)\.(?<minor>\d+)").unwrap(),
			"v$<major>-$<minor>",
		)];
		assert_eq!(apply_replacements("version 1.2", &rules).unwrap(), "version v1-2");
	}

	#[test]
	fn test_rules_compose_in_order() {
		let forward = [Replacement::literal("A", "B"), Replacement::literal("B", "C")];
		assert_eq!(apply_replacements("A", &forward).unwrap(), "C");

		let reversed = [Replacement::literal("B", "C"), Replacement::literal("A", "B")];
		assert_eq!(apply_replacements("A", &reversed).unwrap(), "B");
	}

	#[test]
	fn test_function_target_receives_match_info() {
		let rules = [Replacement::with_fn(global(r"(\d)"), |m: &MatchInfo<'_>| {
			Ok(format!("<{}@{}:{}>", m.matched, m.offset, m.groups[0].unwrap_or("")))
		})];
		assert_eq!(apply_replacements("a1b2", &rules).unwrap(), "a<1@1:1>b<2@3:2>");
	}

	#[test]
	fn test_function_output_is_not_expanded() {
		let rules = [Replacement::with_fn("x", |_: &MatchInfo<'_>| Ok("$&".to_string()))];
		assert_eq!(apply_replacements("x", &rules).unwrap(), "$&");
	}

	#[test]
	fn test_function_called_once_per_replacement() {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&calls);
		let rules = [Replacement::with_fn(global("o"), move |_: &MatchInfo<'_>| {
			counter.fetch_add(1, Ordering::SeqCst);
			Ok("0".to_string())
		})];
		assert_eq!(apply_replacements("foo boo", &rules).unwrap(), "f00 b00");
		assert_eq!(calls.load(Ordering::SeqCst), 4);
	}

	#[test]
	fn test_function_error_propagates() {
		let rules = [Replacement::with_fn("x", |_: &MatchInfo<'_>| {
			Err(anyhow::anyhow!("callback failed"))
		})];
		let err = apply_replacements("x", &rules).unwrap_err();
		assert!(matches!(err, ReplaceError::Callback(_)));
		assert_eq!(err.to_string(), "callback failed");
	}

	#[test]
	fn test_invalid_from_reports_index() {
		let rules = [
			Replacement::literal("a", "b"),
			Replacement::new(RuleValue::Unsupported { type_name: "integer" }, "x"),
		];
		match apply_replacements("a", &rules).unwrap_err() {
			ReplaceError::FromTypeError { index } => assert_eq!(index, 1),
			other => panic!("Expected FromTypeError, got {other:?}"),
		}
	}

	#[test]
	fn test_invalid_to() {
		let rules = [Replacement::new("a", global("b"))];
		let err = apply_replacements("a", &rules).unwrap_err();
		assert!(matches!(err, ReplaceError::ToTypeError { index: 0 }));
		assert!(err.to_string().contains("not of type 'string' or 'Function'"));
	}

	#[test]
	fn test_from_checked_before_to() {
		let rules = [Replacement {
			from: RuleValue::missing(),
			to: RuleValue::missing(),
		}];
		assert!(matches!(
			apply_replacements("a", &rules),
			Err(ReplaceError::FromTypeError { index: 0 })
		));
	}

	#[test]
	fn test_function_as_from_is_rejected() {
		let rules = [Replacement::new(
			RuleValue::function(|_: &MatchInfo<'_>| Ok(String::new())),
			"x",
		)];
		assert!(matches!(
			apply_replacements("a", &rules),
			Err(ReplaceError::FromTypeError { .. })
		));
	}

	#[test]
	fn test_replacement_is_idempotent_when_not_reintroducing() {
		let rules = [Replacement::pattern(global("__VERSION__"), "1.0.0")];
		let once = apply_replacements("v=__VERSION__; w=__VERSION__", &rules).unwrap();
		let twice = apply_replacements(&once, &rules).unwrap();
		assert_eq!(once, twice);
	}

	#[test]
	fn test_dollar_zero_is_literal() {
		let rules = [Replacement::pattern(global("__CLI_VERSION__"), "$0.1.2")];
		assert_eq!(
			apply_replacements("version: __CLI_VERSION__", &rules).unwrap(),
			"version: $0.1.2"
		);
	}
}
