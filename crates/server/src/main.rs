use anyhow::Context;
use teamroster_server::{AppState, app, config};
use teamroster_store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "teamroster_server=info,teamroster_store=info,tower_http=info".into()
            }),
        )
        .init();

    let config = config::load()?;

    // Initialize database
    let db_path = config.db_path();
    tracing::info!("database: {}", db_path.display());
    let store = Store::open(&db_path)?;
    tracing::info!("database initialized");

    let addr = config.bind_addr();
    let router = app(AppState { store, config });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("listening on http://{addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
