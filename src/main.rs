use std::sync::Arc;

use clap::Parser;
use range_server::cli::Cli;
use range_server::config::{AppState, Config};
use range_server::error::ServerError;
use range_server::{logger, server};

fn main() -> Result<(), ServerError> {
    let cli = Cli::parse();
    let cfg = Config::load(&cli)?;

    // Held until exit so buffered log lines reach the file
    let _log_guard = logger::init(&cfg.logging)?;

    // Every connection runs on this thread through the LocalSet; file reads
    // go to tokio's blocking pool
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), ServerError> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(AppState::new(cfg)?);
    let listener = server::create_listener(addr).map_err(|source| ServerError::Bind { addr, source })?;

    logger::log_server_start(&addr, state.files.root(), &state.config);

    // Connections are served with spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(listener, state, server::shutdown_signal()))
        .await;

    tracing::info!("Server stopped");
    Ok(())
}
