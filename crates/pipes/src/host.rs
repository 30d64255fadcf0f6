// File: src/host.rs
// Purpose: Serve a `Pipes` app over HTTP with axum

use crate::dispatcher::Pipes;
use crate::params::Params;
use crate::request::RawRequest;
use crate::value::Value;
use anyhow::Context as _;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Router,
};
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Router sending every request through the app
pub fn router(app: Arc<Pipes>) -> Router {
    Router::new().fallback(dispatch).with_state(app)
}

/// Bind `addr` and serve until the process stops
pub async fn serve(app: Arc<Pipes>, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running at http://{}", addr);

    axum::serve(listener, router(app))
        .await
        .context("Server error")?;
    Ok(())
}

async fn dispatch(
    State(app): State<Arc<Pipes>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    let params = collect_params(&uri, &headers, &body);
    let raw = RawRequest {
        uri: target.clone(),
        method,
        params,
        headers,
    };

    let result = tokio::task::spawn_blocking(move || {
        let mut ctx = app.context(raw);
        let outcome = app
            .run(&mut ctx)
            .map(|route| route.map(|r| r.pattern().to_string()));
        (ctx, outcome)
    })
    .await;

    match result {
        Ok((ctx, Ok(Some(pattern)))) => {
            tracing::debug!("{} served by {}", target, pattern);
            match ctx.into_sent() {
                Some(sent) => sent.into_response(),
                None => StatusCode::OK.into_response(),
            }
        }
        Ok((_, Ok(None))) => error_response(
            StatusCode::NOT_FOUND,
            "Page Not Found",
            &format!("No route for '{}'", uri.path()),
        ),
        Ok((_, Err(err))) => {
            tracing::error!("dispatch of {} failed: {}", target, err);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "The request could not be completed.",
            )
        }
        Err(err) => {
            tracing::error!("dispatch task for {} panicked: {}", target, err);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "The request could not be completed.",
            )
        }
    }
}

/// Query params overlaid with body params (urlencoded or JSON object)
fn collect_params(uri: &Uri, headers: &HeaderMap, body: &Bytes) -> Params {
    let mut params: Params = uri.query().map(parse_urlencoded).unwrap_or_default().into_iter().collect();

    if body.is_empty() {
        return params;
    }

    let content_type = headers
        .get("content-type")
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or_default();

    if content_type.contains("application/json") {
        match serde_json::from_slice::<JsonValue>(body) {
            Ok(JsonValue::Object(map)) => {
                params.merge(map.into_iter().map(|(k, v)| (k, Value::from(v))));
            }
            Ok(_) => tracing::warn!("ignoring non-object JSON body"),
            Err(e) => tracing::warn!("ignoring malformed JSON body: {}", e),
        }
    } else if content_type.contains("application/x-www-form-urlencoded") {
        params.merge(parse_urlencoded(&String::from_utf8_lossy(body)));
    }

    params
}

/// Decode `a=1&b=two+words` pairs; keys without `=` get an empty value
pub fn parse_urlencoded(input: &str) -> Vec<(String, String)> {
    fn decode(raw: &str) -> String {
        let raw = raw.replace('+', " ");
        urlencoding::decode(&raw)
            .map(|s| s.into_owned())
            .unwrap_or(raw)
    }

    input
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

fn error_response(status: StatusCode, title: &str, message: &str) -> Response {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head><title>{title}</title></head>
<body>
  <h1>{code} {title}</h1>
  <p>{message}</p>
  <a href="/">Go Home</a>
</body>
</html>"#,
        code = status.as_u16(),
        title = title,
        message = html_escape::encode_text(message),
    );
    (status, Html(html)).into_response()
}
