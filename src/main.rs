use anyhow::Result;
use clap::{Parser, Subcommand};
use foodgram::routes::AppState;
use sqlx::{Sqlite, migrate::MigrateDatabase, sqlite::SqlitePoolOptions};

/// foodgram - Recipe sharing service
#[derive(Parser)]
#[command(name = "foodgram")]
#[command(about = "Recipe sharing, favorites and shopping lists", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Load the ingredient catalog and default tags from a JSON file
    Load {
        /// Path to the ingredients JSON file
        #[arg(long, default_value = "data/ingredients.json")]
        file: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = foodgram::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    foodgram::observability::init_observability(&config.observability.log_level)?;

    match cli.command {
        Commands::Serve { host, port } => serve_command(config, host, port).await,
        Commands::Migrate => migrate_command(config).await,
        Commands::Reset => reset_command(config).await,
        Commands::Load { file } => load_command(config, file).await,
    }
}

#[tracing::instrument(skip(config))]
async fn serve_command(
    config: foodgram::config::Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting foodgram server...");

    let host = host_override.unwrap_or_else(|| config.server.host.clone());
    let port = port_override.unwrap_or(config.server.port);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    std::fs::create_dir_all(&config.media.root)?;

    let app = foodgram::routes::router(AppState { pool, config });

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: foodgram::config::Config) -> Result<()> {
    let url = &config.database.url;

    if !Sqlite::database_exists(url).await? {
        tracing::info!("Creating database {url}");
        Sqlite::create_database(url).await?;
    }

    let pool = SqlitePoolOptions::new().connect(url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations complete");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn reset_command(config: foodgram::config::Config) -> Result<()> {
    let url = &config.database.url;

    if Sqlite::database_exists(url).await? {
        tracing::warn!("Dropping database {url}");
        Sqlite::drop_database(url).await?;
    }

    migrate_command(config).await
}

#[tracing::instrument(skip(config))]
async fn load_command(config: foodgram::config::Config, file: String) -> Result<()> {
    let pool = SqlitePoolOptions::new()
        .connect(&config.database.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let raw = std::fs::read_to_string(&file)?;
    let seeds: Vec<foodgram_recipe::IngredientSeed> = serde_json::from_str(&raw)?;

    let inserted = foodgram_recipe::load_ingredients(&pool, &seeds).await?;
    tracing::info!("Loaded {inserted} ingredients from {file}");

    foodgram_recipe::seed_tags(&pool).await?;
    tracing::info!("Default tags in place");

    Ok(())
}
