//! `bookd`: the book server binary.
//!
//! Usage:
//!   bookd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/bookshelf/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod routes;

use book::token::TokenAuthority;
use book::BookModule;
use bookshelf_core::Module;
use clap::Parser;
use tracing::info;

use config::ServerConfig;

/// Book server.
#[derive(Parser, Debug)]
#[command(name = "bookd", about = "Book server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides `server.listen`).
    #[arg(long = "listen")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    bootstrap::verify_config(&server_config)?;

    let service_config = bootstrap::service_config(&server_config, cli.listen);
    if let Some(dir) = &service_config.data_dir {
        std::fs::create_dir_all(dir)?;
    }
    let store = bootstrap::open_book_store(&service_config)?;

    let tokens = TokenAuthority::new(
        &server_config.jwt.secret,
        bootstrap::token_ttl(&server_config),
    );
    let book_module = BookModule::new(store, tokens);
    info!("{} module initialized", book_module.name());

    let app = routes::build_router(&[&book_module]);

    let listener = tokio::net::TcpListener::bind(&service_config.listen).await?;
    info!("bookd listening on {}", service_config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
