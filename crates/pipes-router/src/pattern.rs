/// Pattern parsing for route definitions
///
/// A route pattern is literal text with `:name` placeholders, e.g. `/users/:id/posts/:post`.
/// All functions here are **pure**: same pattern in, same segments and regex source out.

use once_cell::sync::Lazy;
use regex::Regex;

/// A placeholder is `:` followed by an identifier that is also a valid regex group name.
static PARAM_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r":([A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// What a placeholder captures: one or more ASCII word characters.
pub const PARAM_CHARS: &str = "[A-Za-z0-9_]+";

/// A parsed piece of a route pattern
///
/// # Examples
///
/// ```
/// use pipes_router::pattern::{parse_pattern, PatternSegment};
///
/// let segments = parse_pattern("/users/:id");
/// assert_eq!(
///     segments,
///     vec![
///         PatternSegment::Static("/users/".to_string()),
///         PatternSegment::Param("id".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    /// Literal text, matched verbatim (slashes included)
    Static(String),
    /// Named capture: `:id`
    Param(String),
}

/// Splits a pattern into literal runs and named placeholders
///
/// Tokens that do not start with a letter or underscore (`:42`) stay literal.
pub fn parse_pattern(pattern: &str) -> Vec<PatternSegment> {
    let mut segments = Vec::new();
    let mut literal_start = 0;

    for caps in PARAM_TOKEN.captures_iter(pattern) {
        let (Some(token), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if token.start() > literal_start {
            segments.push(PatternSegment::Static(
                pattern[literal_start..token.start()].to_string(),
            ));
        }
        segments.push(PatternSegment::Param(name.as_str().to_string()));
        literal_start = token.end();
    }

    if literal_start < pattern.len() {
        segments.push(PatternSegment::Static(pattern[literal_start..].to_string()));
    }

    segments
}

/// Names of the placeholders in declaration order (duplicates kept)
pub fn param_names(segments: &[PatternSegment]) -> Vec<&str> {
    segments
        .iter()
        .filter_map(|segment| match segment {
            PatternSegment::Param(name) => Some(name.as_str()),
            PatternSegment::Static(_) => None,
        })
        .collect()
}

/// Builds the anchored regex source for a parsed pattern
///
/// Literal text is escaped, placeholders become named groups, and an optional
/// trailing slash is tolerated before the end anchor.
///
/// ```
/// use pipes_router::pattern::{parse_pattern, regex_source};
///
/// let source = regex_source(&parse_pattern("/users/:id"));
/// assert_eq!(source, "^/users/(?P<id>[A-Za-z0-9_]+)/?$");
/// ```
pub fn regex_source(segments: &[PatternSegment]) -> String {
    let body: String = segments
        .iter()
        .map(|segment| match segment {
            PatternSegment::Static(text) => regex::escape(text),
            PatternSegment::Param(name) => format!("(?P<{}>{})", name, PARAM_CHARS),
        })
        .collect();

    format!("^{}/?$", body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_static() {
        assert_eq!(
            parse_pattern("/about"),
            vec![PatternSegment::Static("/about".to_string())]
        );
    }

    #[test]
    fn test_parse_multiple_params() {
        let segments = parse_pattern("/users/:user/posts/:post");
        assert_eq!(param_names(&segments), vec!["user", "post"]);
        assert_eq!(segments.len(), 4);
    }

    #[test]
    fn test_parse_param_inside_segment() {
        let segments = parse_pattern("/files/:name.json");
        assert_eq!(
            segments,
            vec![
                PatternSegment::Static("/files/".to_string()),
                PatternSegment::Param("name".to_string()),
                PatternSegment::Static(".json".to_string()),
            ]
        );
    }

    #[test]
    fn test_numeric_token_stays_literal() {
        assert_eq!(
            parse_pattern("/at/:42"),
            vec![PatternSegment::Static("/at/:42".to_string())]
        );
    }

    #[test]
    fn test_empty_pattern() {
        assert!(parse_pattern("").is_empty());
        assert_eq!(regex_source(&[]), "^/?$");
    }

    #[test]
    fn test_literal_metacharacters_escaped() {
        let source = regex_source(&parse_pattern("/v1.0/*"));
        assert_eq!(source, r"^/v1\.0/\*/?$");
    }
}
