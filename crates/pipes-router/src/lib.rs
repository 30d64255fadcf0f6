//! # Pipes Router
//!
//! Route pattern compilation and matching:
//! - Literal routes (`/about`)
//! - Named captures (`/users/:id`), one or more word characters each
//! - Implicit optional trailing slash (`/users/42/` matches `/users/:id`)
//! - Whole-path anchoring (no prefix or suffix matches)
//!
//! A pattern is compiled into a [`Matcher`] once; the matcher tests a normalized
//! request path and yields a [`MatchResult`] with named and positional captures.
//! Which route wins, method filters and handler dispatch live in the `pipes` crate.
//!
//! ## Example
//!
//! ```
//! use pipes_router::Matcher;
//!
//! let matcher = Matcher::compile("/users/:id").unwrap();
//!
//! let result = matcher.captures("/users/42").unwrap();
//! assert_eq!(result.get("id"), Some("42"));
//! assert_eq!(result.positional(), ["/users/42", "42"]);
//!
//! assert!(matcher.captures("/users/").is_none());
//! ```

use regex::Regex;
use std::collections::HashMap;

pub mod path;
pub mod pattern;

pub use path::{path_info, strip_base_path, strip_query, PathInfo};
pub use pattern::{param_names, parse_pattern, regex_source, PatternSegment};

// ============================================================================
// Errors
// ============================================================================

/// A route pattern that cannot be turned into a matcher
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("route pattern `{pattern}` captures `:{name}` more than once")]
    DuplicateParam { pattern: String, name: String },

    #[error("route pattern `{pattern}` does not compile: {message}")]
    Invalid { pattern: String, message: String },
}

// ============================================================================
// Core Types
// ============================================================================

/// Compiled, reusable form of a route pattern
#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: String,
    regex: Regex,
    names: Vec<String>,
}

/// Result of matching a path against a [`Matcher`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Named captures in group order
    named: Vec<(String, String)>,
    /// Every group including group 0 (the whole match)
    positional: Vec<String>,
}

impl Matcher {
    /// Compiles a route pattern
    ///
    /// # Errors
    ///
    /// Fails when a capture name is repeated (`/:id/:id`) or the resulting
    /// expression is rejected by the regex engine.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let segments = parse_pattern(pattern);
        let names = param_names(&segments);

        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(PatternError::DuplicateParam {
                    pattern: pattern.to_string(),
                    name: name.to_string(),
                });
            }
        }

        let source = regex_source(&segments);
        let regex = Regex::new(&source).map_err(|e| PatternError::Invalid {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!("compiled route pattern {} -> {}", pattern, source);

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            names: names.into_iter().map(String::from).collect(),
        })
    }

    /// The raw pattern this matcher was compiled from
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The generated, anchored regular expression
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Capture names in declaration order
    pub fn param_names(&self) -> &[String] {
        &self.names
    }

    /// Checks the path without extracting captures
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Matches the full path and extracts captures
    ///
    /// Returns `None` when the path does not match.
    pub fn captures(&self, path: &str) -> Option<MatchResult> {
        let caps = self.regex.captures(path)?;

        let positional = caps
            .iter()
            .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
            .collect();

        let named = self
            .names
            .iter()
            .filter_map(|name| {
                caps.name(name)
                    .map(|m| (name.clone(), m.as_str().to_string()))
            })
            .collect();

        Some(MatchResult { named, positional })
    }
}

impl MatchResult {
    /// Value of a named capture
    pub fn get(&self, name: &str) -> Option<&str> {
        self.named
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Named captures in group order
    pub fn named(&self) -> impl Iterator<Item = (&str, &str)> {
        self.named.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// All groups, group 0 first
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// Groups after the whole match
    pub fn captures(&self) -> &[String] {
        self.positional.get(1..).unwrap_or_default()
    }

    /// Named captures as a map
    pub fn params(&self) -> HashMap<String, String> {
        self.named.iter().cloned().collect()
    }
}

/// Shorthand for [`Matcher::compile`]
pub fn compile(pattern: &str) -> Result<Matcher, PatternError> {
    Matcher::compile(pattern)
}
