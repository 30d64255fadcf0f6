// Demo routes for the reference server

use pipes::{halt, Context, Outcome, Pipes, Result, RouteOptions, StatusCode};

/// Register the demo routes, relative to the configured views directory
pub fn register(app: &mut Pipes) -> Result<()> {
    let views = app.config().views.clone();

    app.get("/", RouteOptions::callback(home))?;
    app.get("/hello/:name", RouteOptions::callback(hello))?;
    app.get(
        "/admin",
        RouteOptions::callback(|_ctx, _tail| halt((StatusCode::FORBIDDEN, "Forbidden"))),
    )?;
    app.get("/guide/:path", RouteOptions::callback(moved_guide))?;

    // Docs come from docs/, falling back to shared/
    app.get(
        "/docs/:path",
        RouteOptions::paths([views.join("docs"), views.join("shared")]).with_bubble(false),
    )?;

    // Pages render every matching fragment: page body then extras
    app.any(
        "/:path",
        RouteOptions::paths([views.join("pages"), views.join("extras")]),
    )?;

    Ok(())
}

fn home(ctx: &mut Context, _tail: &str) -> Outcome<String> {
    ctx.response.set_header("content-type", "text/html; charset=utf-8");
    Ok(concat!(
        "<h1>pipes</h1>\n",
        "<ul>\n",
        "  <li><a href=\"/hello/world\">/hello/:name</a></li>\n",
        "  <li><a href=\"/docs/intro\">/docs/intro</a></li>\n",
        "  <li><a href=\"/about\">/about</a></li>\n",
        "  <li><a href=\"/admin\">/admin</a></li>\n",
        "</ul>\n"
    )
    .to_string())
}

fn hello(ctx: &mut Context, _tail: &str) -> Outcome<String> {
    ctx.response.set_header("content-type", "text/plain; charset=utf-8");
    let name = ctx.params().get_str("name").unwrap_or("stranger");
    Ok(format!("Hello, {}!", name))
}

fn moved_guide(ctx: &mut Context, tail: &str) -> Outcome<String> {
    let target = format!("/docs/{}", tail);
    ctx.redirect(&target, StatusCode::MOVED_PERMANENTLY)
}
