// File: src/request.rs
// Purpose: Inbound request: normalized path, format, effective method and params

use crate::config::Config;
use crate::params::Params;
use axum::http::{HeaderMap, Method};
use pipes_router::path::{path_info, strip_base_path, strip_query};

/// Format used when neither the URI nor the params name one
pub const DEFAULT_FORMAT: &str = "html";

/// Methods a POST may be rewritten to through the `_method` param
const OVERRIDABLE_METHODS: [Method; 4] = [Method::DELETE, Method::GET, Method::PUT, Method::POST];

/// Transport-level request attributes handed over by the host
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    /// Request URI as received, query string included
    pub uri: String,
    pub method: Method,
    /// Query and body params merged by the host
    pub params: Params,
    pub headers: HeaderMap,
}

impl RawRequest {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            method,
            ..Self::default()
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// Request as seen by routes and handlers
#[derive(Debug, Clone)]
pub struct Request {
    /// URI after query removal and base-path stripping
    pub uri: String,

    /// Directory plus file name without extension; what route patterns match against
    pub path: String,

    /// Lowercased URI extension, else the `format` param, else "html"
    pub format: String,

    /// Effective HTTP method (after `_method` override)
    pub method: Method,

    /// Query/body params, route captures are merged in on match
    pub params: Params,

    /// Request headers
    pub headers: HeaderMap,
}

impl Request {
    /// Build a request from transport attributes, applying config policies
    pub fn from_raw(raw: RawRequest, config: &Config) -> Self {
        let RawRequest {
            uri,
            method,
            mut params,
            headers,
        } = raw;

        let method = Self::effective_method(method, &params, config.request_method_override);

        let uri = strip_base_path(strip_query(&uri), &config.request_base_path).to_string();
        let info = path_info(&uri);

        let format = match info.extension {
            Some(ext) => ext.to_lowercase(),
            None => params
                .get_str("format")
                .filter(|f| !f.is_empty())
                .unwrap_or(DEFAULT_FORMAT)
                .to_string(),
        };
        params.set("format", format.as_str());
        let path = info.path;

        Self {
            uri,
            path,
            format,
            method,
            params,
            headers,
        }
    }

    /// Shorthand for a request with default config
    pub fn new(method: Method, uri: impl Into<String>, params: Params) -> Self {
        Self::from_raw(
            RawRequest::new(method, uri).with_params(params),
            &Config::default(),
        )
    }

    fn effective_method(method: Method, params: &Params, allow_override: bool) -> Method {
        let method = Method::from_bytes(method.as_str().to_ascii_uppercase().as_bytes())
            .unwrap_or(method);

        if method != Method::POST || !allow_override {
            return method;
        }

        let requested = params
            .get_str("_method")
            .unwrap_or_default()
            .to_ascii_uppercase();

        match OVERRIDABLE_METHODS
            .iter()
            .find(|candidate| candidate.as_str() == requested)
        {
            Some(overridden) => {
                tracing::debug!("method override: POST -> {}", overridden);
                overridden.clone()
            }
            None => method,
        }
    }

    /// Get a header value
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Check if this is an XMLHttpRequest
    pub fn is_ajax(&self) -> bool {
        self.get_header("x-requested-with") == Some("XMLHttpRequest")
    }

    /// Check if this is a specific method
    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    pub fn is_post(&self) -> bool {
        self.method == Method::POST
    }

    pub fn is_put(&self) -> bool {
        self.method == Method::PUT
    }

    pub fn is_delete(&self) -> bool {
        self.method == Method::DELETE
    }
}
