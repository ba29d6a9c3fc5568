use muebles_service::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    init_tracing(&config)?;

    let state = AppState::builder().config(config.clone()).build().await?;
    tracing::debug!(?state, "Application state ready");

    let app = router(state);

    Server::new(config).serve(app).await
}
