use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xdevbot::config::Config;
use xdevbot::github::OctocrabClient;
use xdevbot::server::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xdevbot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("loading configuration")?;
    tracing::debug!(?config, "Loaded configuration");

    let github = OctocrabClient::from_token(config.token.clone(), config.github_timeout)
        .context("building GitHub client")?;

    let addr = config.bind_address.clone();
    let app = build_router(Arc::new(config), Arc::new(github));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
