use tower_http::cors::CorsLayer;

use admin_portal::{config, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up PORTAL_BACKEND_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!(
        "starting admin portal gateway in {:?} mode",
        config.environment
    );

    let state = handlers::GatewayState::from_config(config)?;
    let mut app = handlers::app(state);
    if config.server.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
