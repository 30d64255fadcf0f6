// File: src/dispatcher.rs
// Purpose: Route registry and first-match dispatch

use crate::cascade::{resolve_within, Cascade};
use crate::config::Config;
use crate::context::Context;
use crate::error::Result;
use crate::halt::Outcome;
use crate::params::Params;
use crate::renderer::{FileRenderer, TemplateRenderer};
use crate::request::{RawRequest, Request};
use crate::route::{Route, RouteOptions};
use axum::http::Method;
use pipes_router::MatchResult;
use std::sync::Arc;

/// Per-run overrides
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Flush at the end of the run; `None` uses `Config::flush`
    pub flush: Option<bool>,
}

/// An application: configuration, ordered routes and a template renderer
///
/// Register routes through `&mut self`, then share the app (e.g. in an `Arc`)
/// and dispatch through `&self`.
pub struct Pipes {
    config: Config,
    routes: Vec<Route>,
    renderer: Arc<dyn TemplateRenderer>,
}

impl Pipes {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            routes: Vec::new(),
            renderer: Arc::new(FileRenderer::new()),
        }
    }

    /// Replace the template renderer used by cascades and views
    pub fn with_renderer(mut self, renderer: impl TemplateRenderer + 'static) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Replace the whole route list
    pub fn set_routes(&mut self, routes: Vec<Route>) {
        self.routes = routes;
    }

    /// Register a route for any method (unless `options.method` is set)
    pub fn any(&mut self, pattern: &str, options: RouteOptions) -> Result<&Route> {
        let route = Route::new(pattern, options)?;
        tracing::info!(
            "registered route {} {}",
            route.method().map(Method::as_str).unwrap_or("ANY"),
            route.pattern()
        );

        let index = self.routes.len();
        self.routes.push(route);
        Ok(&self.routes[index])
    }

    pub fn get(&mut self, pattern: &str, options: RouteOptions) -> Result<&Route> {
        self.any(pattern, options.with_method(Method::GET))
    }

    pub fn post(&mut self, pattern: &str, options: RouteOptions) -> Result<&Route> {
        self.any(pattern, options.with_method(Method::POST))
    }

    pub fn put(&mut self, pattern: &str, options: RouteOptions) -> Result<&Route> {
        self.any(pattern, options.with_method(Method::PUT))
    }

    pub fn delete(&mut self, pattern: &str, options: RouteOptions) -> Result<&Route> {
        self.any(pattern, options.with_method(Method::DELETE))
    }

    /// Build a request with this app's config applied
    pub fn request(&self, raw: RawRequest) -> Request {
        Request::from_raw(raw, &self.config)
    }

    /// Fresh context for one dispatch
    pub fn context(&self, raw: RawRequest) -> Context {
        Context::new(self.request(raw))
    }

    /// First route matching the request, in registration order
    pub fn find(&self, request: &Request) -> Result<Option<(&Route, MatchResult)>> {
        for route in &self.routes {
            if let Some(matched) = route.matches(request)? {
                return Ok(Some((route, matched)));
            }
        }
        Ok(None)
    }

    fn cascade(&self) -> Cascade<'_> {
        Cascade::new(self.renderer.as_ref(), &self.config.template_extension)
    }

    /// Dispatch with default options
    pub fn run(&self, ctx: &mut Context) -> Result<Option<&Route>> {
        self.run_with(ctx, RunOptions::default())
    }

    /// Execute the first matching route and write its output
    ///
    /// Returns `Ok(None)` when no route matched; the response is left untouched.
    pub fn run_with(&self, ctx: &mut Context, options: RunOptions) -> Result<Option<&Route>> {
        let Some((route, matched)) = self.find(&ctx.request)? else {
            tracing::debug!("no route for {} {}", ctx.request.method, ctx.request.path);
            return Ok(None);
        };

        tracing::debug!(
            "{} {} matched {}",
            ctx.request.method,
            ctx.request.path,
            route.pattern()
        );
        ctx.route = Some(route.clone());

        let tail = matched
            .get("path")
            .map(str::to_string)
            .unwrap_or_else(|| ctx.request.path.clone());

        let output = route.execute(ctx, &tail, &matched, &self.cascade())?;
        if !output.is_empty() {
            ctx.response.write(output);
        }

        if options.flush.unwrap_or(self.config.flush) {
            ctx.flush();
        }

        Ok(Some(route))
    }

    /// Render `views/<template>` with extra locals
    ///
    /// Returns `Ok(None)` when the template does not exist.
    pub fn render(&self, ctx: &mut Context, template: &str, locals: &Params) -> Outcome<Option<String>> {
        let views = &self.config.views;
        let candidate = views.join(template.trim_start_matches('/'));

        match resolve_within(views, &candidate)? {
            Some(file) => Ok(Some(self.renderer.render(&file, ctx, locals)?)),
            None => {
                tracing::debug!("view not found: {}", candidate.display());
                Ok(None)
            }
        }
    }
}

impl Default for Pipes {
    fn default() -> Self {
        Self::new()
    }
}
