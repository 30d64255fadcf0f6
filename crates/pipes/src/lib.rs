// Pipes - ordered pattern routing with callback and cascading template handlers
//
// Routes are tried in registration order; the first match runs either a
// callback or a cascade over template directories. Handlers can halt early
// with a status, a body or a whole replacement response.

pub mod cascade;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod halt;
pub mod host;
pub mod params;
pub mod renderer;
pub mod request;
pub mod response;
pub mod route;
pub mod value;

pub use cascade::Cascade;
pub use config::{Config, ServerConfig};
pub use context::Context;
pub use dispatcher::{Pipes, RunOptions};
pub use error::{Error, Result};
pub use halt::{halt, Halt, Outcome, Signal};
pub use params::Params;
pub use renderer::{FileRenderer, TemplateRenderer};
pub use request::{RawRequest, Request};
pub use response::{Response, Sent};
pub use route::{Handler, Route, RouteOptions};
pub use value::Value;

// Re-export commonly used types from dependencies
pub use axum;
pub use axum::http::{Method, StatusCode};
pub use pipes_router::{MatchResult, Matcher, PatternError};
