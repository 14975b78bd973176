use anyhow::Context;

use inventrobil_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    inventrobil_observability::init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        storage = %config.storage,
        data_dir = %config.data_dir.display(),
        numeric_policy = %config.numeric_policy,
        "starting inventrobil"
    );

    let app = inventrobil_api::app::build_app(&config).await?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
