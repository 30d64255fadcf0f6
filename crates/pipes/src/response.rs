use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response as AxumResponse};

/// Content type sent when the response sets none
pub const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=utf-8";

// -- Shared helpers --

fn insert_header(headers: &mut HeaderMap, key: &str, value: &str) {
    match (
        HeaderName::from_bytes(key.as_bytes()),
        HeaderValue::from_str(value),
    ) {
        (Ok(name), Ok(val)) => {
            headers.insert(name, val);
        }
        _ => tracing::warn!("dropping invalid response header {:?}: {:?}", key, value),
    }
}

// ============================================================================
// Response
// ============================================================================

/// Response accumulator for one request
///
/// Status, headers and body fragments are buffered until [`Response::flush`].
/// Writes after a flush still update the buffer but never reach the wire.
///
/// ```
/// use pipes::Response;
///
/// let mut response = Response::new();
/// response.write("Hello, ");
/// response.write("world");
/// response.set_header("X-Powered-By", "pipes");
///
/// let sent = response.flush().unwrap();
/// assert_eq!(sent.body, b"Hello, world");
/// assert!(response.flush().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Response {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<String>,
    length: usize,
    flushed: bool,
    sent: Option<Sent>,
}

/// What a flush hands to the host: the wire form of a [`Response`]
#[derive(Debug, Clone, PartialEq)]
pub struct Sent {
    /// `None` means the host default (200)
    pub status: Option<StatusCode>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    /// Response with a status preset, handy for `Halt::Replace`
    pub fn with_status(status: StatusCode) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Current status, `None` when left to the host default
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    /// Set a header; the last write for a name wins
    pub fn set_header(&mut self, key: impl AsRef<str>, value: impl AsRef<str>) {
        insert_header(&mut self.headers, key.as_ref(), value.as_ref());
    }

    /// Get a header value
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)?.to_str().ok()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Append a fragment to the body
    pub fn write(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        self.length += fragment.len();
        self.body.push(fragment);
    }

    /// Discard every fragment and use `body` as the whole body
    pub fn replace_body(&mut self, body: impl Into<String>) {
        let body = body.into();
        self.length = body.len();
        self.body = vec![body];
    }

    /// Body fragments in write order
    pub fn fragments(&self) -> &[String] {
        &self.body
    }

    /// Concatenated body
    pub fn body(&self) -> String {
        self.body.concat()
    }

    /// Running byte length of the body
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Set status and `Location` for a redirect
    pub fn redirect(&mut self, url: &str, status: StatusCode) {
        self.status = Some(status);
        self.set_header(header::LOCATION.as_str(), url);
    }

    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    /// Send status, headers and body exactly once
    ///
    /// The snapshot is also kept on the response, see [`Response::sent`].
    /// Returns `None` when this response was already flushed.
    pub fn flush(&mut self) -> Option<Sent> {
        if self.flushed {
            tracing::debug!("response already flushed, ignoring");
            return None;
        }
        self.flushed = true;

        let sent = Sent {
            status: self.status,
            headers: self.headers.clone(),
            body: self.body().into_bytes(),
        };
        self.sent = Some(sent.clone());
        Some(sent)
    }

    /// What the first flush sent, if any
    pub fn sent(&self) -> Option<&Sent> {
        self.sent.as_ref()
    }

    /// Take the flushed snapshot; the response stays flushed
    pub fn take_sent(&mut self) -> Option<Sent> {
        self.sent.take()
    }
}

impl Sent {
    /// Effective status with the host default applied
    pub fn status_or_default(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Body as text (lossy)
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl IntoResponse for Sent {
    /// Responses without a `Content-Type` are served as HTML
    fn into_response(mut self) -> AxumResponse {
        if !self.headers.contains_key(header::CONTENT_TYPE) {
            self.headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(DEFAULT_CONTENT_TYPE),
            );
        }
        (self.status_or_default(), self.headers, self.body).into_response()
    }
}

// ============================================================================
// Tests
// ============================================================================
