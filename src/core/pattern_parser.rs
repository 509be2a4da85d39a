//! Pattern utilities for read-file discovery
//!
//! Read-file patterns are glob patterns relative to a run root that may carry
//! `{placeholder}` tokens (`{run}`, `{sample}`, `{library}`). Placeholder values
//! are glob-escaped before substitution so names containing `[`, `*` or `?`
//! only ever match themselves.

use glob::{MatchOptions, Pattern, PatternError};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Placeholders understood in read-file patterns
pub const KNOWN_PLACEHOLDERS: &[&str] = &["run", "sample", "library"];

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static regex"))
}

/// Names of all placeholders used in a template, in order of appearance
pub fn placeholders(template: &str) -> Vec<String> {
    placeholder_regex()
        .captures_iter(template)
        .map(|c| c[1].to_string())
        .collect()
}

/// True if the template uses `{name}`
pub fn has_placeholder(template: &str, name: &str) -> bool {
    placeholders(template).iter().any(|p| p == name)
}

/// Substitute placeholders with glob-escaped values.
///
/// Placeholders without a value are left untouched; callers validate templates
/// up front so this only happens for deliberately partial expansion.
pub fn expand_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &regex::Captures| {
            let key = &caps[1];
            match values.iter().find(|(k, _)| *k == key) {
                Some((_, value)) => Pattern::escape(value),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Substitute the given placeholders and replace the remaining ones with `*`
pub fn expand_with_wildcards(template: &str, values: &[(&str, &str)]) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &regex::Captures| {
            match values.iter().find(|(k, _)| *k == &caps[1]) {
                Some((_, value)) => Pattern::escape(value),
                None => "*".to_string(),
            }
        })
        .into_owned()
}

/// True when `relative` matches `template` with `values` substituted and any
/// other placeholder left open
pub fn matches_expanded(template: &str, values: &[(&str, &str)], relative: &Path) -> bool {
    Pattern::new(&expand_with_wildcards(template, values))
        .map(|p| p.matches_path_with(relative, match_options()))
        .unwrap_or(false)
}

/// Replace every placeholder with `*`
pub fn wildcard_placeholders(template: &str) -> String {
    placeholder_regex().replace_all(template, "*").into_owned()
}

/// Length of the literal text a set of substituted values contributes.
///
/// Used to rank competing claims on the same file: the claim that pinned more
/// literal characters is the more specific one.
pub fn literal_weight(template: &str, values: &[(&str, &str)]) -> usize {
    placeholders(template)
        .iter()
        .filter_map(|p| values.iter().find(|(k, _)| k == p))
        .map(|(_, v)| v.len())
        .sum()
}

/// Join a glob-escaped root directory and a relative pattern
pub fn rooted_pattern(root: &Path, relative: &str) -> Result<String, String> {
    let root_str = root
        .to_str()
        .ok_or_else(|| format!("Path is not valid UTF-8: {}", root.display()))?;
    let escaped = Pattern::escape(root_str.trim_end_matches(['/', '\\']));
    Ok(format!("{}/{}", escaped, relative.trim_start_matches('/')))
}

/// Match options shared by discovery globbing: `*` never crosses directories
pub fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    }
}

/// Exclusion matcher for paths relative to the run root
#[derive(Debug, Clone, Default)]
pub struct ExcludeMatcher {
    patterns: Vec<Pattern>,
}

impl ExcludeMatcher {
    pub fn new(pattern_strings: &[String]) -> Result<Self, String> {
        Ok(Self {
            patterns: parse_patterns(pattern_strings)?,
        })
    }

    /// True when the relative path matches any exclusion pattern
    pub fn is_excluded(&self, relative: &Path) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_path_with(relative, match_options()))
    }
}

fn parse_patterns(pattern_strings: &[String]) -> Result<Vec<Pattern>, String> {
    pattern_strings
        .iter()
        .map(|s| {
            Pattern::new(s).map_err(|e: PatternError| format!("Invalid pattern '{}': {}", s, e))
        })
        .collect()
}
