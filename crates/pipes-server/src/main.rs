mod routes;

use anyhow::Context as _;
use pipes::{host, Config, Pipes};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let config_path = std::env::var("PIPES_CONFIG").unwrap_or_else(|_| "pipes.toml".to_string());
    let config = Config::load(&config_path).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {:#}, using defaults", e);
        Config::default()
    });

    info!(
        "pipes starting (views: {}, base path: {:?})",
        config.views.display(),
        config.request_base_path
    );

    let addr = config.bind_address();
    let mut app = Pipes::with_config(config);
    routes::register(&mut app).context("Failed to register routes")?;
    info!("Registered {} routes", app.routes().len());

    host::serve(Arc::new(app), &addr).await
}
