mod cli;

use storefront::{
    config::{self, Config},
    images::ImageStore,
    products::ProductService,
    server::{self, AppContext},
};
use storefront_db::migrations;
use storefront_db::pool::{get_conn, init_pool, DbPool};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};

fn open_database(config: &Config) -> Result<DbPool> {
    let db_path = config.database.path.to_string_lossy();
    tracing::info!("Initializing database at {}", db_path);
    init_pool(&db_path).with_context(|| format!("Failed to open database {db_path}"))
}

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting Storefront server");

    let db_pool = open_database(&config)?;
    let store = ImageStore::open(&config.storage).with_context(|| {
        format!(
            "Failed to create upload directory {}",
            config.storage.upload_dir.display()
        )
    })?;
    tracing::info!("Storing uploads in {}", store.upload_dir().display());

    let products = ProductService::new(db_pool, store);
    server::start_server(AppContext::new(config, products)).await
}

fn migrate(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let pool = open_database(&config)?;
    let conn = get_conn(&pool)?;
    let version = migrations::current_version(&conn)?;
    println!(
        "Database {} is at schema version {} (latest {})",
        config.database.path.display(),
        version,
        migrations::latest_version()
    );
    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, checking the default search paths");
            config::load_config_or_default(None)?
        }
    };

    println!("✓ Configuration is valid");
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Max upload: {} bytes", config.server.max_upload_bytes);
    println!("  Database: {}", config.database.path.display());
    println!("  Upload dir: {}", config.storage.upload_dir.display());
    println!("  Base URL: {}", config.storage.base_url);
    println!(
        "  Allowed extensions: {}",
        config.storage.allowed_extensions.join(", ")
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "storefront=trace,storefront_db=debug,storefront_common=debug,tower_http=debug"
                .to_string()
        } else {
            "storefront=debug,storefront_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Migrate => migrate(cli.config.as_deref()),
        Commands::Validate { config } => {
            validate_config(config.as_deref().or(cli.config.as_deref()))
        }
        Commands::Version => {
            println!("storefront {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
