//! # TaskHub API Server
//!
//! Serves the `/v1` project, task and account endpoints over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/taskhub JWT_SECRET=... cargo run -p taskhub-api
//! ```

use std::sync::Arc;
use taskhub_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskhub_shared::{
    db::{
        migrations::{ensure_database_exists, run_migrations},
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    mail::{http::HttpMailer, log::LogMailer, Mailer},
    store::postgres::PgStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "taskhub_api=debug,taskhub_shared=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("TaskHub API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    if !config.api.production {
        ensure_database_exists(&config.database.url).await?;
    }

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let mailer: Arc<dyn Mailer> = match (&config.mail.api_url, &config.mail.api_key) {
        (Some(url), Some(key)) => Arc::new(HttpMailer::new(url, key, &config.mail.from)?),
        _ => {
            tracing::warn!("MAIL_API_URL not set, outgoing mail will only be logged");
            Arc::new(LogMailer)
        }
    };

    let store = PgStore::new(pool.clone());
    let bind_address = config.bind_address();
    let app = build_router(AppState::new(Arc::new(store), mailer, config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, closing database pool...");
    close_pool(pool).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
