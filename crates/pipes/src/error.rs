// File: src/error.rs
// Purpose: Errors raised while registering or executing routes

use pipes_router::PatternError;
use std::path::PathBuf;

/// Failures surfaced to the caller of registration or `Pipes::run`
///
/// Halts are not errors; see [`crate::halt::Signal`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A route declared neither a callback nor any cascade path
    #[error("route `{pattern}` needs a callback or at least one path")]
    MissingHandler { pattern: String },

    /// A cascade candidate resolved outside its base directory
    #[error("route tried to access unsafe path {}", path.display())]
    UnsafePath { path: PathBuf },

    /// The route matched but no cascade path had a backing file
    #[error("no matching files in route paths for `{tail}` (route `{pattern}`)")]
    NoMatchingFiles { pattern: String, tail: String },

    /// The route pattern could not be compiled
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// A template existed but could not be read
    #[error("failed to render template {}: {source}", path.display())]
    Render {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
