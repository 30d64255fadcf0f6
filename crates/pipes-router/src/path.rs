/// URI path utilities
///
/// All functions are **pure**: given same input, always produce same output with no side effects.
/// They turn a raw request URI into the normalized path that route patterns are matched against.

/// Normalized path plus the extension that was stripped from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathInfo<'a> {
    /// Directory portion joined with the file name, extension removed
    pub path: String,
    /// Extension after the last dot of the final segment, if any and non-empty
    pub extension: Option<&'a str>,
}

/// Drops the query string and fragment from a URI
///
/// ```
/// use pipes_router::path::strip_query;
///
/// assert_eq!(strip_query("/users?page=2"), "/users");
/// assert_eq!(strip_query("/docs#intro"), "/docs");
/// assert_eq!(strip_query("/plain"), "/plain");
/// ```
pub fn strip_query(uri: &str) -> &str {
    uri.split(|c| c == '?' || c == '#').next().unwrap_or(uri)
}

/// Strips a mount prefix from the URI
///
/// Trailing slashes on `base` are ignored, and an empty remainder becomes `/`.
/// The match is a plain string prefix with no segment boundary, so base `/app`
/// also strips `/application` to `lication`, which [`path_info`] then roots as
/// `/lication`.
///
/// ```
/// use pipes_router::path::strip_base_path;
///
/// assert_eq!(strip_base_path("/app/users", "/app/"), "/users");
/// assert_eq!(strip_base_path("/app", "/app"), "/");
/// assert_eq!(strip_base_path("/other", "/app"), "/other");
/// assert_eq!(strip_base_path("/users", ""), "/users");
/// ```
pub fn strip_base_path<'a>(uri: &'a str, base: &str) -> &'a str {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return uri;
    }

    match uri.strip_prefix(base) {
        Some("") => "/",
        Some(rest) => rest,
        None => uri,
    }
}

/// Splits a URI path into its route path and extension
///
/// Trailing slashes are ignored when locating the final segment, the extension is
/// whatever follows the last dot of that segment, and the directory part is re-joined
/// with the extension-less file name.
///
/// ```
/// use pipes_router::path::path_info;
///
/// let info = path_info("/users/42.json");
/// assert_eq!(info.path, "/users/42");
/// assert_eq!(info.extension, Some("json"));
///
/// let info = path_info("/users/42/");
/// assert_eq!(info.path, "/users/42");
/// assert_eq!(info.extension, None);
///
/// assert_eq!(path_info("/").path, "/");
/// ```
pub fn path_info(uri: &str) -> PathInfo<'_> {
    let trimmed = uri.trim_end_matches('/');

    let (dirname, basename) = match trimmed.rfind('/') {
        Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
        // Relative input (no slash at all) is treated as rooted
        None => ("", trimmed),
    };

    let (filename, extension) = match basename.rfind('.') {
        Some(idx) => (&basename[..idx], Some(&basename[idx + 1..])),
        None => (basename, None),
    };

    PathInfo {
        path: format!("{}/{}", dirname.trim_end_matches('/'), filename),
        extension: extension.filter(|ext| !ext.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query("/a?b=c#d"), "/a");
        assert_eq!(strip_query("?only"), "");
    }

    #[test]
    fn test_strip_base_path_root_base() {
        assert_eq!(strip_base_path("/x", "/"), "/x");
        assert_eq!(strip_base_path("/app/x", "/app"), "/x");
    }

    #[test]
    fn test_strip_base_path_prefix_only() {
        // Plain string prefix: "/application" loses "/app"
        assert_eq!(strip_base_path("/application", "/app"), "lication");
        assert_eq!(path_info(strip_base_path("/application", "/app")).path, "/lication");
    }

    #[test]
    fn test_path_info_nested_extension() {
        let info = path_info("/downloads/archive.tar.gz");
        assert_eq!(info.path, "/downloads/archive.tar");
        assert_eq!(info.extension, Some("gz"));
    }

    #[test]
    fn test_path_info_dot_in_directory() {
        let info = path_info("/v1.2/users");
        assert_eq!(info.path, "/v1.2/users");
        assert_eq!(info.extension, None);
    }

    #[test]
    fn test_path_info_empty_extension() {
        let info = path_info("/users.");
        assert_eq!(info.path, "/users");
        assert_eq!(info.extension, None);
    }

    #[test]
    fn test_path_info_hidden_file() {
        let info = path_info("/.json");
        assert_eq!(info.path, "/");
        assert_eq!(info.extension, Some("json"));
    }

    #[test]
    fn test_path_info_root_and_empty() {
        assert_eq!(path_info("/").path, "/");
        assert_eq!(path_info("").path, "/");
        assert_eq!(path_info("///").path, "/");
    }

    #[test]
    fn test_path_info_relative() {
        assert_eq!(path_info("lication").path, "/lication");
    }
}
