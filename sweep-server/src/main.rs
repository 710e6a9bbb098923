use sweep_server::{AppState, Config, Server, init_logger, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, logging)
    dotenv::dotenv().ok();
    init_logger();

    print_banner();
    tracing::info!("sweep-server v{} starting...", env!("CARGO_PKG_VERSION"));

    // 2. Load configuration - missing required vars abort here
    let config = Config::from_env()?;

    // 3. Initialize shared state (database, clients)
    let state = AppState::initialize(&config).await?;

    // 4. Serve
    let server = Server::new(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}
