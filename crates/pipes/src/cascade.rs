// File: src/cascade.rs
// Purpose: Resolve a tail path against ordered base directories and render the hits

use crate::context::Context;
use crate::error::{Error, Result};
use crate::halt::Outcome;
use crate::params::Params;
use crate::renderer::TemplateRenderer;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Template lookup bound to a renderer and a file extension
pub struct Cascade<'a> {
    renderer: &'a dyn TemplateRenderer,
    extension: &'a str,
}

impl<'a> Cascade<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer, extension: &'a str) -> Self {
        Self {
            renderer,
            extension,
        }
    }

    /// `base/<tail>.<extension>`, with the tail's leading slashes dropped
    pub fn candidate(&self, base: &Path, tail: &str) -> PathBuf {
        let tail = tail.trim_start_matches('/');
        if self.extension.is_empty() {
            base.join(tail)
        } else {
            base.join(format!("{}.{}", tail, self.extension))
        }
    }

    /// Render `tail` from each base directory in order
    ///
    /// With `bubble` every existing candidate is rendered and the outputs are
    /// concatenated; without it the first existing candidate wins.
    pub fn resolve(
        &self,
        ctx: &mut Context,
        bases: &[PathBuf],
        tail: &str,
        bubble: bool,
    ) -> Outcome<String> {
        let mut output = String::new();
        let mut included = false;
        let locals = Params::new();

        for base in bases {
            let candidate = self.candidate(base, tail);
            let Some(file) = resolve_within(base, &candidate)? else {
                tracing::debug!("cascade miss: {}", candidate.display());
                continue;
            };

            tracing::debug!("cascade hit: {}", file.display());
            output.push_str(&self.renderer.render(&file, ctx, &locals)?);
            included = true;

            if !bubble {
                break;
            }
        }

        if !included {
            let pattern = ctx
                .route
                .as_ref()
                .map(|route| route.pattern().to_string())
                .unwrap_or_default();
            return Err(Error::NoMatchingFiles {
                pattern,
                tail: tail.to_string(),
            }
            .into());
        }

        Ok(output)
    }
}

/// Canonical path of `candidate` when it is an existing file inside `base`
///
/// Returns `Ok(None)` when the file does not exist. Fails with
/// [`Error::UnsafePath`] when the candidate escapes `base`, either lexically
/// (`..` segments) or after symlinks are resolved.
pub fn resolve_within(base: &Path, candidate: &Path) -> Result<Option<PathBuf>> {
    if !normalize(candidate).starts_with(normalize(base)) {
        tracing::warn!("rejecting path outside {}: {}", base.display(), candidate.display());
        return Err(Error::UnsafePath {
            path: candidate.to_path_buf(),
        });
    }

    let (Ok(canonical_base), Ok(canonical)) = (fs::canonicalize(base), fs::canonicalize(candidate))
    else {
        return Ok(None);
    };

    if !canonical.starts_with(&canonical_base) {
        tracing::warn!("rejecting link outside {}: {}", base.display(), canonical.display());
        return Err(Error::UnsafePath { path: canonical });
    }

    Ok(canonical.is_file().then_some(canonical))
}

/// Resolve `.` and `..` without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}
