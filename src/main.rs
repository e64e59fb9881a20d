use clap::Parser;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use comboserver::cli::Cli;
use comboserver::config::{AppState, Config};
use comboserver::logger;
use comboserver::server::{self, SignalHandler};
use comboserver::store::{DirStore, FileStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let cfg = Config::load(&cli)?;
    logger::init(&cfg)?;

    // Build the Tokio runtime, sized by `server.workers` when set
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), BoxError> {
    let store = DirStore::new(&cfg.combo.root).map_err(|e| {
        format!("Cannot serve directory {}: {e}", cfg.combo.root.display())
    })?;
    let store: Arc<dyn FileStore> = Arc::new(store);

    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(AppState::new(cfg, store));
    let active_connections = Arc::new(AtomicUsize::new(0));

    let signals = Arc::new(SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    server::start_server_loop(listener, state, active_connections, signals).await
}
