//! Application entry point.

use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use wallet_dashboard_proxy::api::{create_router, create_router_with_rate_limit};
use wallet_dashboard_proxy::app::{AppConfig, AppState};
use wallet_dashboard_proxy::infra::YayaTransactionGateway;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    info!("Wallet Dashboard Proxy v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_env()
        .context("Refusing to start: set YAYA_API_KEY, YAYA_API_SECRET and YAYA_BASE_URL")?;

    let gateway = YayaTransactionGateway::new(
        &config.upstream.base_url,
        config.upstream.signer(),
        config.upstream.timeout,
    )?;
    info!(
        timeout_secs = config.upstream.timeout.as_secs(),
        "   ✓ Transaction gateway created"
    );

    let app_state = Arc::new(AppState::from_config(&config, Arc::new(gateway)));
    info!(
        default_limit = config.default_limit,
        origins = ?config.cors_origins,
        "   ✓ Application state ready"
    );

    let router = if config.enable_rate_limiting {
        info!(
            max_requests = config.rate_limit.max_requests,
            window_secs = config.rate_limit.window.as_secs(),
            "   ✓ Rate limiting enabled"
        );
        create_router_with_rate_limit(app_state, config.rate_limit)
    } else {
        info!("   ○ Rate limiting disabled");
        create_router(app_state)
    };

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🚀 Server starting on http://{}", addr);
    info!("📖 Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
