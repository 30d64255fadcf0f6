//! Integration tests for route dispatch
//!
//! Tests are organized by feature area:
//! - Registration
//! - First-match selection
//! - Halts and redirects
//! - Method override
//! - Flushing

use pipes::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn get(uri: &str) -> RawRequest {
    RawRequest::new(Method::GET, uri)
}

fn text(body: &'static str) -> RouteOptions {
    RouteOptions::callback(move |_ctx, _tail| Ok(body.to_string()))
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_route_without_handler_rejected() {
    let mut app = Pipes::new();
    let err = app.any("/empty", RouteOptions::default()).unwrap_err();

    assert!(matches!(err, Error::MissingHandler { .. }));
    assert!(app.routes().is_empty());
}

#[test]
fn test_method_helpers_set_filter() {
    let mut app = Pipes::new();
    app.get("/a", text("a")).unwrap();
    app.post("/b", text("b")).unwrap();
    app.put("/c", text("c")).unwrap();
    app.delete("/d", text("d")).unwrap();
    app.any("/e", text("e")).unwrap();

    let methods: Vec<Option<&Method>> = app.routes().iter().map(Route::method).collect();
    assert_eq!(
        methods,
        vec![
            Some(&Method::GET),
            Some(&Method::POST),
            Some(&Method::PUT),
            Some(&Method::DELETE),
            None
        ]
    );
}

// ============================================================================
// First-match selection
// ============================================================================

#[test]
fn test_first_matching_route_wins() {
    let mut app = Pipes::new();
    app.any("/users/:id", text("first")).unwrap();
    app.any("/users/:name", text("second")).unwrap();

    let mut ctx = app.context(get("/users/42"));
    let route = app.run(&mut ctx).unwrap().unwrap();

    assert_eq!(route.pattern(), "/users/:id");
    assert_eq!(ctx.sent().unwrap().text(), "first");
    assert!(!app.routes()[1].is_compiled());
}

#[test]
fn test_no_match_returns_none() {
    let mut app = Pipes::new();
    app.get("/users/:id", text("user")).unwrap();

    let mut ctx = app.context(get("/posts/1"));
    assert!(app.run(&mut ctx).unwrap().is_none());
    assert!(ctx.sent().is_none());
    assert!(ctx.response.is_empty());
}

#[rstest]
#[case("/users/42", true)]
#[case("/users/42/", true)]
#[case("/users/", false)]
#[case("/users/42/edit", false)]
fn test_capture_route(#[case] uri: &str, #[case] matched: bool) {
    let mut app = Pipes::new();
    app.get(
        "/users/:id",
        RouteOptions::callback(|ctx, _tail| {
            Ok(format!("user {}", ctx.params().get_str("id").unwrap_or("?")))
        }),
    )
    .unwrap();

    let mut ctx = app.context(get(uri));
    let route = app.run(&mut ctx).unwrap();

    assert_eq!(route.is_some(), matched);
    if matched {
        assert_eq!(ctx.sent().unwrap().text(), "user 42");
        assert_eq!(ctx.params().captures(), vec!["42"]);
    }
}

#[test]
fn test_callback_receives_path_capture_as_tail() {
    let mut app = Pipes::new();
    app.get(
        "/docs/:path",
        RouteOptions::callback(|_ctx, tail| Ok(format!("tail={}", tail))),
    )
    .unwrap();
    app.get(
        "/other",
        RouteOptions::callback(|_ctx, tail| Ok(format!("tail={}", tail))),
    )
    .unwrap();

    let mut ctx = app.context(get("/docs/intro.html"));
    app.run(&mut ctx).unwrap();
    assert_eq!(ctx.sent().unwrap().text(), "tail=intro");

    let mut ctx = app.context(get("/other"));
    app.run(&mut ctx).unwrap();
    assert_eq!(ctx.sent().unwrap().text(), "tail=/other");
}

#[test]
fn test_query_param_not_overwritten_by_capture() {
    let mut app = Pipes::new();
    app.get(
        "/users/:id",
        RouteOptions::callback(|ctx, _tail| Ok(ctx.params().get_str("id").unwrap_or("").to_string())),
    )
    .unwrap();

    let params: Params = [("id", "query")].into_iter().collect();
    let mut ctx = app.context(get("/users/42?id=query").with_params(params));
    app.run(&mut ctx).unwrap();

    assert_eq!(ctx.sent().unwrap().text(), "query");
}

#[test]
fn test_bad_pattern_surfaces_from_run() {
    let mut app = Pipes::new();
    app.get("/:id/:id", text("never")).unwrap();

    let mut ctx = app.context(get("/a/b"));
    let err = app.run(&mut ctx).unwrap_err();
    assert!(matches!(err, Error::Pattern(PatternError::DuplicateParam { .. })));
}

#[test]
fn test_empty_output_writes_nothing() {
    let mut app = Pipes::new();
    app.get("/quiet", RouteOptions::callback(|_ctx, _tail| Ok(String::new())))
        .unwrap();

    let mut ctx = app.context(get("/quiet"));
    app.run(&mut ctx).unwrap();
    assert!(ctx.response.fragments().is_empty());
}

// ============================================================================
// Halts and redirects
// ============================================================================

#[test]
fn test_halt_with_status_and_body() {
    let mut app = Pipes::new();
    app.get(
        "/missing",
        RouteOptions::callback(|ctx, _tail| {
            ctx.response.write("partial output");
            halt((StatusCode::NOT_FOUND, "Not Found"))
        }),
    )
    .unwrap();

    let mut ctx = app.context(get("/missing"));
    let route = app.run(&mut ctx).unwrap();

    assert_eq!(route.map(Route::pattern), Some("/missing"));
    let sent = ctx.sent().unwrap();
    assert_eq!(sent.status, Some(StatusCode::NOT_FOUND));
    assert_eq!(sent.text(), "Not Found");
    assert_eq!(ctx.response.len(), "Not Found".len());
}

#[test]
fn test_halt_status_keeps_body() {
    let mut app = Pipes::new();
    app.get(
        "/accepted",
        RouteOptions::callback(|ctx, _tail| {
            ctx.response.write("queued");
            halt(StatusCode::ACCEPTED)
        }),
    )
    .unwrap();

    let mut ctx = app.context(get("/accepted"));
    app.run(&mut ctx).unwrap();

    let sent = ctx.sent().unwrap();
    assert_eq!(sent.status, Some(StatusCode::ACCEPTED));
    assert_eq!(sent.text(), "queued");
}

#[test]
fn test_halt_replaces_response() {
    let mut app = Pipes::new();
    app.get(
        "/teapot",
        RouteOptions::callback(|ctx, _tail| {
            ctx.response.set_header("X-Discarded", "yes");
            let mut replacement = Response::with_status(StatusCode::IM_A_TEAPOT);
            replacement.write("short and stout");
            halt(replacement)
        }),
    )
    .unwrap();

    let mut ctx = app.context(get("/teapot"));
    app.run(&mut ctx).unwrap();

    let sent = ctx.sent().unwrap();
    assert_eq!(sent.status, Some(StatusCode::IM_A_TEAPOT));
    assert_eq!(sent.text(), "short and stout");
    assert!(!sent.headers.contains_key("x-discarded"));
}

#[test]
fn test_redirect() {
    let mut app = Pipes::new();
    app.get(
        "/old",
        RouteOptions::callback(|ctx, _tail| {
            if ctx.request.is_get() {
                return ctx.redirect("/new", StatusCode::MOVED_PERMANENTLY);
            }
            Ok("not redirected".to_string())
        }),
    )
    .unwrap();

    let mut ctx = app.context(get("/old"));
    app.run(&mut ctx).unwrap();

    let sent = ctx.sent().unwrap();
    assert_eq!(sent.status, Some(StatusCode::MOVED_PERMANENTLY));
    assert_eq!(sent.headers.get("location").unwrap(), "/new");
    assert_eq!(sent.text(), "");
}

#[test]
fn test_handler_error_propagates() {
    let mut app = Pipes::new();
    app.get(
        "/broken",
        RouteOptions::callback(|_ctx, tail| {
            Err(Signal::from(Error::NoMatchingFiles {
                pattern: "/broken".to_string(),
                tail: tail.to_string(),
            }))
        }),
    )
    .unwrap();

    let mut ctx = app.context(get("/broken"));
    assert!(matches!(app.run(&mut ctx), Err(Error::NoMatchingFiles { .. })));
    assert!(ctx.sent().is_none());
}

// ============================================================================
// Method override
// ============================================================================

fn override_app(enabled: bool) -> Pipes {
    let mut app = Pipes::with_config(Config {
        request_method_override: enabled,
        ..Config::default()
    });
    app.put("/items/:id", text("put")).unwrap();
    app.post("/items/:id", text("post")).unwrap();
    app
}

#[rstest]
#[case(true, "put")]
#[case(false, "post")]
fn test_post_method_override(#[case] enabled: bool, #[case] expected: &str) {
    let app = override_app(enabled);
    let params: Params = [("_method", "PUT")].into_iter().collect();
    let mut ctx = app.context(RawRequest::new(Method::POST, "/items/1").with_params(params));

    app.run(&mut ctx).unwrap();
    assert_eq!(ctx.sent().unwrap().text(), expected);
}

#[test]
fn test_base_path_applied() {
    let mut app = Pipes::with_config(Config {
        request_base_path: "/app".to_string(),
        ..Config::default()
    });
    app.get("/users/:id", text("user")).unwrap();

    let mut ctx = app.context(get("/app/users/7"));
    assert!(app.run(&mut ctx).unwrap().is_some());
    assert_eq!(ctx.request.path, "/users/7");
}

// ============================================================================
// Flushing
// ============================================================================

#[test]
fn test_flush_disabled_per_run() {
    let mut app = Pipes::new();
    app.get("/", text("home")).unwrap();

    let mut ctx = app.context(get("/"));
    app.run_with(&mut ctx, RunOptions { flush: Some(false) })
        .unwrap();

    assert!(ctx.sent().is_none());
    assert!(!ctx.response.is_flushed());
    assert_eq!(ctx.response.body(), "home");

    ctx.response.write(" page");
    assert_eq!(ctx.into_sent().unwrap().text(), "home page");
}

#[test]
fn test_flush_disabled_by_config() {
    let mut app = Pipes::new();
    app.config_mut().flush = false;
    app.get("/", text("home")).unwrap();

    let mut ctx = app.context(get("/"));
    app.run(&mut ctx).unwrap();
    assert!(ctx.sent().is_none());

    let mut ctx = app.context(get("/"));
    app.run_with(&mut ctx, RunOptions { flush: Some(true) })
        .unwrap();
    assert!(ctx.sent().is_some());
}

#[test]
fn test_handler_flush_mid_route_is_kept() {
    let mut app = Pipes::new();
    app.get(
        "/stream",
        RouteOptions::callback(|ctx, _tail| {
            ctx.response.write("streamed");
            ctx.response.flush();
            Ok(" after flush".to_string())
        }),
    )
    .unwrap();

    let mut ctx = app.context(get("/stream"));
    app.run(&mut ctx).unwrap();

    assert_eq!(ctx.sent().map(Sent::text), Some("streamed".to_string()));
    assert_eq!(ctx.response.body(), "streamed after flush");
    assert_eq!(ctx.into_sent().unwrap().text(), "streamed");
}

#[test]
fn test_set_routes_replaces_registry() {
    let mut app = Pipes::new();
    app.get("/a", text("a")).unwrap();
    let kept = app.routes().to_vec();

    app.set_routes(Vec::new());
    assert!(app.run(&mut app.context(get("/a"))).unwrap().is_none());

    app.set_routes(kept);
    assert!(app.run(&mut app.context(get("/a"))).unwrap().is_some());
}
