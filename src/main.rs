use std::sync::Arc;
use tokio::net::TcpListener;

use script_runner::config::{AppState, Config};
use script_runner::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load_from("config")?;
    logger::init(&cfg)?;

    // Build the Tokio runtime, honoring the workers config
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;
    let state = Arc::new(AppState::new(&cfg));

    logger::log_server_start(&addr, &cfg);

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local.run_until(accept_loop(listener, state)).await
}

/// Accept connections until the process is terminated externally
async fn accept_loop(
    listener: TcpListener,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => server::accept_connection(stream, peer_addr, &state),
            Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
        }
    }
}
