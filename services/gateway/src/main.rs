use gateway::router::create_router;
use gateway::state::AppState;
use ledger::{LedgerConfig, LedgerStore};
use std::net::SocketAddr;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting Ledger API service");

    // Resolve configuration from the environment
    let data_dir = env_or("LEDGER_DATA_DIR", "./data");
    let mut config = LedgerConfig::new(&data_dir);
    if let Ok(path) = std::env::var("LEDGER_PARTICIPANTS") {
        config.participants_path = path.into();
    }

    // Open the store: replays the journal, loads the participant directory
    let store = LedgerStore::open(config)?;
    let state = AppState::new(store);

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr: SocketAddr = env_or("LEDGER_BIND_ADDR", "0.0.0.0:8080").parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
