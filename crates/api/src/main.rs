use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    userdir_observability::init();

    let config = userdir_api::config::Config::from_env()?;
    let services = userdir_api::app::build_services(&config)?;
    let app = userdir_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
