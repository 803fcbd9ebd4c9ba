//! Recipe Finder CLI
//!
//! # Usage
//!
//! ```bash
//! # Serve the HTTP API
//! recipe-finder serve --config config/recipe_finder.yaml
//!
//! # Run a search offline
//! echo '[{"parameter":"Diet","value":"Vegetarian"}]' | recipe-finder query
//!
//! # Print store statistics and compile a snapshot
//! recipe-finder stats --write-snapshot data/knowledge.bin
//! ```

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recipe_finder::config::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use recipe_finder::{load_store, RawCriterion, RecipeSearchService, SearchConfig};

#[derive(Parser)]
#[command(name = "recipe-finder")]
#[command(version)]
#[command(about = "Recipe search over a food knowledge base")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file
    #[arg(long, short, global = true, env = CONFIG_PATH_ENV, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Knowledge store file (overrides knowledge.path)
    #[arg(long, short, global = true)]
    knowledge: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Listen address (overrides server.bind_addr)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Run a search and print matched records as JSON
    Query {
        /// Criteria JSON file (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Print knowledge store statistics
    Stats {
        /// Also write the loaded store as a bincode snapshot
        #[arg(long)]
        write_snapshot: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipe_finder=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    tracing::info!(path = %cli.config.display(), "Loading configuration");
    let mut config = SearchConfig::load_or_default(&cli.config)?;
    config.apply_env_overrides();
    if let Some(path) = cli.knowledge {
        config.knowledge.path = path;
    }

    let service = build_service(&config)?;

    match cli.command {
        Commands::Serve { bind } => {
            let addr = bind.unwrap_or_else(|| config.server.bind_addr.clone());
            serve(service, &addr).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Query { file } => run_query(&service, file.as_deref()),
        Commands::Stats { write_snapshot } => {
            print!("{}", service.stats());
            println!("  Index tokens: {}", service.index().token_count());

            if let Some(path) = write_snapshot {
                service.store().save_snapshot(&path).with_context(|| {
                    format!("failed to write snapshot to {}", path.display())
                })?;
                println!("Snapshot written to {}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_service(config: &SearchConfig) -> anyhow::Result<Arc<RecipeSearchService>> {
    let store = load_store(config).with_context(|| {
        format!(
            "failed to load knowledge store from {}",
            config.knowledge.path.display()
        )
    })?;

    let service = RecipeSearchService::new(Arc::new(store))
        .with_recipe_class(config.knowledge.recipe_class.clone())
        .with_matching(&config.matching);

    tracing::info!(
        entities = service.store().len(),
        recipes = service.recipe_count(),
        labels = service.index().len(),
        "Knowledge store loaded"
    );

    Ok(Arc::new(service))
}

fn run_query(service: &RecipeSearchService, file: Option<&Path>) -> anyhow::Result<ExitCode> {
    let input = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let criteria: Vec<RawCriterion> =
        serde_json::from_str(&input).context("criteria must be a JSON array")?;

    match service.search(&criteria) {
        Ok(records) => {
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}", serde_json::json!({ "error": e.to_string() }));
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(feature = "server")]
async fn serve(service: Arc<RecipeSearchService>, addr: &str) -> anyhow::Result<()> {
    let app = recipe_finder::api::build_router(service);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    tracing::info!("recipe-finder listening on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(not(feature = "server"))]
async fn serve(_service: Arc<RecipeSearchService>, _addr: &str) -> anyhow::Result<()> {
    anyhow::bail!("built without the `server` feature")
}
