mod auth;
mod config;
mod error;
mod server;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use auth::{StaticCredentials, TokenIssuer};
use catalog_common::catalog::CatalogClient;
use config::Config;
use product_filter::FilterEngine;
use server::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting catalog-api");

    let config = Config::from_env()?;
    info!(
        listen_addr = %config.listen_addr,
        catalog_url = %config.catalog.catalog_url(),
        timeout_ms = config.catalog.timeout.as_millis(),
        max_retries = config.catalog.max_retries,
        jwt_issuer = %config.jwt_issuer,
        users = config.users.len(),
        word_skip = config.word_ranking.skip,
        word_take = config.word_ranking.take,
        "configuration loaded"
    );

    let catalog = Arc::new(CatalogClient::new(config.catalog.clone())?);
    let tokens = Arc::new(TokenIssuer::new(
        config.jwt_key.as_bytes(),
        config.jwt_issuer.clone(),
        config.token_ttl,
    ));
    let credentials = Arc::new(StaticCredentials::new(config.users.clone()));

    let app = server::build_router(AppState {
        catalog,
        engine: FilterEngine::new(config.word_ranking),
        tokens,
        credentials,
    });

    let listener = TcpListener::bind(&config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "catalog-api ready");
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })?;

    info!("catalog-api shut down");
    Ok(())
}
