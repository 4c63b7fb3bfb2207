use pairledger_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pairledger_observability::init();

    let config = ApiConfig::from_env();
    let app = pairledger_api::app::build_app(&config)?;

    let listener = pairledger_api::app::bind(config.bind).await?;

    tracing::info!(addr = %config.bind, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
