use link_dashboard::{
    router, source::HttpAnalyticsSource, storage::FixtureSource, AppState, Config,
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;

    let state = match &config.fixture_dir {
        Some(dir) => {
            info!("serving analytics fixtures from {}", dir.display());
            AppState::new(FixtureSource::new(dir))
        }
        None => {
            info!("fetching analytics from {}", config.analytics_base_url);
            AppState::new(HttpAnalyticsSource::new(
                config.analytics_base_url.clone(),
                config.request_timeout,
            )?)
        }
    };

    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
