use medialib::config::Config;
use medialib::db::Database;
use medialib::library::{LibraryManager, SharedLibraryManager};
use medialib::server::create_router;
use medialib::store::MemoryStore;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "medialib=info,tower_http=info";

#[tokio::main]
async fn main() {
    // Config first so RUST_LOG can come from .env
    let config = Config::load();

    let log_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(log_filter).init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    if config.env_file_loaded {
        info!("Dev mode: loaded .env file");
    }

    let library_manager = match &config.database_path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            info!("Using SQLite storage at {}", path.display());
            let database = Database::new(&path.to_string_lossy()).await?;
            LibraryManager::from_store(database, config.vault_pin.clone())
        }
        None => {
            info!("Using in-memory storage (set MEDIALIB_DATABASE_PATH to persist)");
            if let Some(path) = Config::default_database_path() {
                info!("Suggested database path: {}", path.display());
            }
            LibraryManager::from_store(MemoryStore::new(), config.vault_pin.clone())
        }
    };

    if config.seed_sample_data {
        library_manager.seed_sample_data().await?;
    }

    let app = create_router(SharedLibraryManager::new(library_manager));

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Media library API listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
