use dashboard_server::{Config, Server, ServerState, init_logger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env and set up logging before anything touches the config
    dotenv::dotenv().ok();
    init_logger();

    tracing::info!("Dashboard server starting...");

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;

    let state = ServerState::initialize(&config).await;

    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
