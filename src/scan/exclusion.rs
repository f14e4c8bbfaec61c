// src/scan/exclusion.rs

use std::fmt;

use regex::Regex;

use crate::errors::{Result, WatcherError};

/// Characters that turn an exclusion rule into a regular expression.
pub const PATTERN_GLYPHS: &[char] = &['*', '?', '{', '}', '[', ']', '(', ')', '+'];

/// A single exclusion rule, classified once when the matcher is built.
#[derive(Clone)]
pub enum ExclusionRule {
    /// Excludes on exact name, exact path, or path substring.
    Literal(String),
    /// Excludes paths matched by the compiled expression. A rule that does
    /// not compile keeps its error so matching can report it.
    Pattern {
        raw: String,
        compiled: std::result::Result<Regex, regex::Error>,
    },
}

impl ExclusionRule {
    pub fn parse(raw: &str) -> Self {
        if is_pattern(raw) {
            ExclusionRule::Pattern {
                raw: raw.to_string(),
                compiled: Regex::new(raw),
            }
        } else {
            ExclusionRule::Literal(raw.to_string())
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            ExclusionRule::Literal(raw) => raw,
            ExclusionRule::Pattern { raw, .. } => raw,
        }
    }

    /// Evaluate this rule against a path and its file name.
    pub fn matches(&self, path: &str, name: &str) -> Result<bool> {
        match self {
            ExclusionRule::Literal(rule) => {
                Ok(name == rule || path == rule || path.contains(rule.as_str()))
            }
            ExclusionRule::Pattern { raw, compiled } => match compiled {
                Ok(re) => Ok(re.is_match(path)),
                Err(err) => Err(WatcherError::InvalidExclusionPattern {
                    rule: raw.clone(),
                    source: err.clone(),
                }),
            },
        }
    }
}

impl fmt::Debug for ExclusionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionRule::Literal(raw) => f.debug_tuple("Literal").field(raw).finish(),
            ExclusionRule::Pattern { raw, compiled } => f
                .debug_struct("Pattern")
                .field("raw", raw)
                .field("valid", &compiled.is_ok())
                .finish(),
        }
    }
}

/// Whether a rule is treated as a regular expression rather than a literal.
pub fn is_pattern(rule: &str) -> bool {
    rule.contains(PATTERN_GLYPHS)
}

/// Ordered set of exclusion rules.
#[derive(Debug, Clone, Default)]
pub struct ExclusionMatcher {
    rules: Vec<ExclusionRule>,
}

impl ExclusionMatcher {
    /// Classify and compile the given rules. Empty rules are dropped.
    pub fn new<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = rules
            .into_iter()
            .filter(|r| !r.as_ref().is_empty())
            .map(|r| ExclusionRule::parse(r.as_ref()))
            .collect();
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[ExclusionRule] {
        &self.rules
    }

    /// Pattern rules that failed to compile, with their errors.
    pub fn invalid_rules(&self) -> Vec<(&str, &regex::Error)> {
        self.rules
            .iter()
            .filter_map(|rule| match rule {
                ExclusionRule::Pattern {
                    raw,
                    compiled: Err(err),
                } => Some((raw.as_str(), err)),
                _ => None,
            })
            .collect()
    }

    /// Decide whether `path` (with final component `name`) is excluded.
    ///
    /// Rules are evaluated in order and the first match wins. Reaching a
    /// pattern rule that does not compile is an error, never a silent
    /// `false`.
    pub fn is_excluded(&self, path: &str, name: &str) -> Result<bool> {
        for rule in &self.rules {
            if rule.matches(path, name)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
