use std::sync::Arc;

use nmt_relay::{build_app, config::Config, logging, translator::ScriptRunner, AppState};
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    logging::init_logging(&config.log_file)?;

    let script_path = config.script_path();
    if !config.riva_dir.is_dir() {
        warn!(riva_dir = %config.riva_dir.display(), "Riva directory not found at startup");
    }
    if !script_path.is_file() {
        warn!(script_path = %script_path.display(), "NMT script not found at startup");
    }

    let bind_socket = config.bind_socket()?;
    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        riva_dir = %config.riva_dir.display(),
        script_path = %script_path.display(),
        nmt_server = %config.nmt_server,
        timeout_secs = config.timeout.as_secs(),
        "server starting"
    );

    let state = AppState::new(config, Arc::new(ScriptRunner::new()));
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received");
}
