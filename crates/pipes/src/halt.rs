// File: src/halt.rs
// Purpose: Early exit from a route with an optional response override

use crate::error::Error;
use crate::response::Response;
use axum::http::StatusCode;

/// What a halt does to the active response
///
/// | payload                     | effect                                  |
/// |-----------------------------|-----------------------------------------|
/// | `Halt::None`                | stop the route, response untouched      |
/// | `Halt::Status(s)`           | overwrite the status                    |
/// | `Halt::StatusAndBody(s, b)` | overwrite the status, body becomes `b`  |
/// | `Halt::Replace(r)`          | `r` becomes the active response         |
#[derive(Debug, Clone, Default)]
pub enum Halt {
    #[default]
    None,
    Status(StatusCode),
    StatusAndBody(StatusCode, String),
    Replace(Response),
}

/// Non-local exit from a handler or template
///
/// `Halt` is absorbed where the route is executed; `Fail` keeps propagating.
#[derive(Debug)]
pub enum Signal {
    Halt(Halt),
    Fail(Error),
}

/// Result type for handlers, templates and anything they call
pub type Outcome<T> = Result<T, Signal>;

impl Halt {
    /// Apply the payload to the active response
    pub fn apply(self, response: &mut Response) {
        match self {
            Halt::None => {}
            Halt::Status(status) => response.set_status(status),
            Halt::StatusAndBody(status, body) => {
                response.set_status(status);
                response.replace_body(body);
            }
            Halt::Replace(replacement) => *response = replacement,
        }
    }
}

impl From<()> for Halt {
    fn from(_: ()) -> Self {
        Halt::None
    }
}

impl From<StatusCode> for Halt {
    fn from(status: StatusCode) -> Self {
        Halt::Status(status)
    }
}

impl From<(StatusCode, String)> for Halt {
    fn from((status, body): (StatusCode, String)) -> Self {
        Halt::StatusAndBody(status, body)
    }
}

impl From<(StatusCode, &str)> for Halt {
    fn from((status, body): (StatusCode, &str)) -> Self {
        Halt::StatusAndBody(status, body.to_string())
    }
}

impl From<Response> for Halt {
    fn from(response: Response) -> Self {
        Halt::Replace(response)
    }
}

impl From<Halt> for Signal {
    fn from(halt: Halt) -> Self {
        Signal::Halt(halt)
    }
}

impl From<Error> for Signal {
    fn from(err: Error) -> Self {
        Signal::Fail(err)
    }
}

impl From<pipes_router::PatternError> for Signal {
    fn from(err: pipes_router::PatternError) -> Self {
        Signal::Fail(err.into())
    }
}

/// Stop the current route
///
/// ```
/// use pipes::{halt, Outcome, StatusCode};
///
/// fn guard(authorized: bool) -> Outcome<String> {
///     if !authorized {
///         return halt((StatusCode::FORBIDDEN, "Forbidden"));
///     }
///     Ok("welcome".to_string())
/// }
///
/// assert!(guard(false).is_err());
/// assert_eq!(guard(true).unwrap(), "welcome");
/// ```
pub fn halt<T>(payload: impl Into<Halt>) -> Outcome<T> {
    Err(Signal::Halt(payload.into()))
}
