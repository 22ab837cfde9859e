//! Replacement and exclusion rules for replace-code.
//!
//! This module handles:
//! - Substring exclusion of file ids
//! - Per-rule validation and sequential replacement
//! - Replacement template expansion (`$&`, `$1`, `$<name>`, ...)

mod expand;
pub mod matcher;
pub mod rewriter;

pub use matcher::ExclusionPatternSet;
pub use rewriter::{MatchInfo, ReplacementSource, ReplacementTarget, apply_replacements, replace};
