use wora_api::setup;
use wora_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    let (_state, router) = setup::initialize_app(config.clone()).await?;

    setup::server::start_server(&config, router).await?;

    Ok(())
}
