use std::sync::Arc;

use dotenv::dotenv;
use tokio::net::{TcpListener, UnixListener};
use tracing::info;
use tracing_subscriber::EnvFilter;

use transformer::{
    chat,
    config::Config,
    progress::{JsonFileBackend, ProgressStore},
    reviews::ReviewStore,
    routes::{self, AppState},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let shared_state = Arc::new(AppState::new(
        chat::backend_from_config(&config)?,
        ReviewStore::new(config.reviews_path()),
        ProgressStore::open(JsonFileBackend::new(config.progress_path())),
    ));

    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut port = "8090".to_string();
    let mut unix_socket = None;

    let mut i = 1; // Skip program name
    while i < args.len() {
        if args[i] == "--unix" && i + 1 < args.len() {
            unix_socket = Some(args[i + 1].clone());
            i += 2; // Skip both --unix and the socket path
        } else {
            port = args[i].clone();
            i += 1;
        }
    }

    let app = routes::app(shared_state, &config.frontend_dir);

    info!(
        "Initialized routes, data in {}, frontend from {}",
        config.data_dir.display(),
        config.frontend_dir.display()
    );

    if let Some(socket_path) = unix_socket {
        // delete the file before binding
        tokio::fs::remove_file(&socket_path).await.ok();
        let listener = UnixListener::bind(&socket_path)?;

        info!("Starting server on Unix socket: {}", socket_path);
        axum::serve(listener, app.into_make_service()).await?;
    } else {
        let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
        info!("Starting server on port {}", port);
        axum::serve(listener, app.into_make_service()).await?;
    }

    Ok(())
}
