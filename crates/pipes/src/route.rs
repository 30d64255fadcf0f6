// File: src/route.rs
// Purpose: Route definition, lazy pattern compilation and execution

use crate::cascade::Cascade;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::halt::{Outcome, Signal};
use crate::params::CAPTURES_KEY;
use crate::request::Request;
use crate::value::Value;
use axum::http::Method;
use once_cell::sync::OnceCell;
use pipes_router::{MatchResult, Matcher};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Callback handler: receives the context and the cascade tail, returns output
///
/// An empty string means "no output".
pub type Handler = Arc<dyn Fn(&mut Context, &str) -> Outcome<String> + Send + Sync>;

/// How a route handles a match
#[derive(Clone)]
pub struct RouteOptions {
    /// Only match this method; `None` matches any
    pub method: Option<Method>,
    pub callback: Option<Handler>,
    /// Base directories searched by the cascade, in order
    pub paths: Vec<PathBuf>,
    /// Render every matching cascade file (true) or stop at the first (false)
    pub bubble: bool,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            method: None,
            callback: None,
            paths: Vec::new(),
            bubble: true,
        }
    }
}

impl RouteOptions {
    /// Options with a callback handler
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&mut Context, &str) -> Outcome<String> + Send + Sync + 'static,
    {
        Self::default().with_callback(f)
    }

    /// Options cascading through a single base directory
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::paths([path])
    }

    /// Options cascading through several base directories
    pub fn paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_bubble(mut self, bubble: bool) -> Self {
        self.bubble = bubble;
        self
    }

    pub fn with_callback<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Context, &str) -> Outcome<String> + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for RouteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteOptions")
            .field("method", &self.method)
            .field("callback", &self.callback.is_some())
            .field("paths", &self.paths)
            .field("bubble", &self.bubble)
            .finish()
    }
}

/// A registered route
///
/// Clones share the compiled matcher.
#[derive(Debug, Clone)]
pub struct Route {
    pattern: String,
    matcher: Arc<OnceCell<Matcher>>,
    options: RouteOptions,
}

impl Route {
    /// Create a route; fails when it has neither a callback nor a cascade path
    pub fn new(pattern: impl Into<String>, options: RouteOptions) -> Result<Self> {
        let pattern = pattern.into();
        if options.callback.is_none() && options.paths.is_empty() {
            return Err(Error::MissingHandler { pattern });
        }

        Ok(Self {
            pattern,
            matcher: Arc::new(OnceCell::new()),
            options,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn method(&self) -> Option<&Method> {
        self.options.method.as_ref()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.options.paths
    }

    pub fn bubble(&self) -> bool {
        self.options.bubble
    }

    pub fn has_callback(&self) -> bool {
        self.options.callback.is_some()
    }

    /// Compiled matcher, built on first use and cached
    pub fn compile(&self) -> Result<&Matcher> {
        let matcher = self
            .matcher
            .get_or_try_init(|| Matcher::compile(&self.pattern))?;
        Ok(matcher)
    }

    pub fn is_compiled(&self) -> bool {
        self.matcher.get().is_some()
    }

    /// Match against a request
    ///
    /// A method mismatch rejects without compiling the pattern.
    pub fn matches(&self, request: &Request) -> Result<Option<MatchResult>> {
        if let Some(method) = &self.options.method {
            if *method != request.method {
                return Ok(None);
            }
        }

        Ok(self.compile()?.captures(&request.path))
    }

    /// Run the handler for a match and return its output
    ///
    /// A halt stops the handler and is applied to `ctx.response` here; it
    /// never reaches the caller.
    pub fn execute(
        &self,
        ctx: &mut Context,
        tail: &str,
        matched: &MatchResult,
        cascade: &Cascade<'_>,
    ) -> Result<String> {
        merge_captures(ctx, matched);

        let outcome = match &self.options.callback {
            Some(callback) => callback(ctx, tail),
            None => cascade.resolve(ctx, &self.options.paths, tail, self.options.bubble),
        };

        match outcome {
            Ok(output) => Ok(output),
            Err(Signal::Halt(halt)) => {
                tracing::debug!("route {} halted: {:?}", self.pattern, halt);
                halt.apply(&mut ctx.response);
                Ok(String::new())
            }
            Err(Signal::Fail(err)) => Err(err),
        }
    }
}

/// Named captures fill missing params; positional captures land under `captures`
fn merge_captures(ctx: &mut Context, matched: &MatchResult) {
    let params = ctx.params_mut();
    for (name, value) in matched.named() {
        params.set_default(name, value);
    }
    params.set(CAPTURES_KEY, Value::from(matched.captures().to_vec()));
}
