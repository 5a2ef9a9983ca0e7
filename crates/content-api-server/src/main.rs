mod api;
mod middleware;

use std::sync::Arc;

use content_api_media::{MediaClient, MediaConfig, Sideloader, Uploads};
use content_api_store::ContentStore;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(content_api_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut store = ContentStore::new();
    if let Some(path) = &config.seed_path {
        let seed = content_api_core::load_seed(path)?;
        let summary = content_api_store::apply_seed(&mut store, &seed)?;
        tracing::info!(
            path = %path.display(),
            categories = summary.categories,
            brands = summary.brands,
            attributes = summary.attributes,
            products = summary.products,
            "catalog seed applied"
        );
    }

    let client = MediaClient::new(&MediaConfig::from_app_config(&config))?;
    let uploads = Uploads::new(&config.uploads_dir, &config.uploads_url);
    let sideloader = Sideloader::new(client, uploads);

    let auth = AuthState::from_config(&config)?;
    let rate_limit = rate_limit_state(&config);
    let state = AppState::new(store, sideloader, Arc::clone(&config));
    let app = build_app(state, auth, rate_limit);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "content api listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
