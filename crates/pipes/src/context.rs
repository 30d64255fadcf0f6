// File: src/context.rs
// Purpose: Per-request state threaded through routes, handlers and templates

use crate::halt::{halt, Halt, Outcome};
use crate::params::Params;
use crate::request::Request;
use crate::response::{Response, Sent};
use crate::route::Route;
use axum::http::StatusCode;

/// Everything one dispatch works on
///
/// A fresh context is built per request, so nothing leaks between requests
/// even when several are dispatched concurrently.
#[derive(Debug)]
pub struct Context {
    pub request: Request,
    pub response: Response,
    /// Route currently executing, set by the dispatcher on match
    pub route: Option<Route>,
    sent: Option<Sent>,
}

impl Context {
    pub fn new(request: Request) -> Self {
        Self {
            request,
            response: Response::new(),
            route: None,
            sent: None,
        }
    }

    pub fn params(&self) -> &Params {
        &self.request.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.request.params
    }

    /// Flush the response, keeping what was sent
    ///
    /// Returns false when the response had already been flushed.
    pub fn flush(&mut self) -> bool {
        match self.response.flush() {
            Some(sent) => {
                self.sent = Some(sent);
                true
            }
            None => false,
        }
    }

    /// What was flushed, if anything
    ///
    /// Covers flushes made directly on `ctx.response` by a handler.
    pub fn sent(&self) -> Option<&Sent> {
        self.sent.as_ref().or_else(|| self.response.sent())
    }

    /// Consume the context, flushing first if nothing was sent yet
    pub fn into_sent(mut self) -> Option<Sent> {
        if self.sent().is_none() {
            self.flush();
        }
        self.sent.or_else(|| self.response.take_sent())
    }

    /// Set status and `Location`, then stop the route
    pub fn redirect<T>(&mut self, url: &str, status: StatusCode) -> Outcome<T> {
        tracing::debug!("redirect {} -> {}", status, url);
        self.response.redirect(url, status);
        halt(Halt::None)
    }

    /// Redirect with 302 Found
    pub fn redirect_to<T>(&mut self, url: &str) -> Outcome<T> {
        self.redirect(url, StatusCode::FOUND)
    }
}
