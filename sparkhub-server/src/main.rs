//! SparkHub Lightning Address server.

use std::sync::Arc;

use sparkhub_lib::wallet::HttpWalletExecutor;
use sparkhub_lib::{AddressCodec, LnurlConfig, PaymentResolver, ReadyWallet};
use sparkhub_server::api::{create_router, AppState};
use sparkhub_server::config::Config;
use sparkhub_server::db::{self, SqliteAddressRegistry};
use sparkhub_server::events::spawn_event_logger;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=info")),
        )
        .init();

    info!("Starting SparkHub...");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        e
    })?;

    info!(
        "Configuration loaded: domain {}, network {}, port {}",
        config.domain, config.network, config.port
    );

    // Wallet init failure is fatal
    let executor = HttpWalletExecutor::new(config.wallet.clone())?;
    let wallet = match ReadyWallet::init(Arc::new(executor)).await {
        Ok(wallet) => wallet,
        Err(e) => {
            error!("Error initializing wallet: {}", e);
            std::process::exit(1);
        }
    };
    let event_logger = spawn_event_logger(&wallet);

    // Connect to database and run migrations
    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;
    let registry = Arc::new(SqliteAddressRegistry::new(pool));

    let resolver = PaymentResolver::new(
        LnurlConfig::new(config.domain.clone()),
        registry.clone(),
        wallet,
        AddressCodec::new(config.network),
    );

    let state = AppState { resolver, registry };
    let app = create_router(state);

    let addr = config.http_addr();
    info!("SparkHub listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = event_logger {
        handle.abort();
    }

    info!("SparkHub shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
