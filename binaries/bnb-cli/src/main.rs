//! bnb: Airbnb listing browser
//!
//! ## Usage
//!
//! ```bash
//! bnb serve                          # http://0.0.0.0:3000, remote dataset
//! bnb serve --bind 127.0.0.1:8080    # custom address
//! BNB_DATASET_PATH=data/airbnb.json bnb search villa
//! bnb price --min 100 --max 200
//! ```

use anyhow::{bail, Context, Result};
use bnb_config::{Config, RefreshPolicy};
use bnb_core::{query, validate_price_range, Property, PropertyId};
use bnb_dataset::{DatasetStore, Snapshot};
use bnb_web::AppState;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "bnb")]
#[command(about = "Airbnb listing browser - server-rendered pages over the property dataset")]
#[command(version)]
struct Cli {
    /// YAML config file (default: ~/.config/bnb/config.yaml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Address to bind, e.g. 127.0.0.1:8080
        #[arg(short, long)]
        bind: Option<String>,

        /// per_request or startup
        #[arg(long)]
        refresh: Option<RefreshPolicy>,
    },

    /// Print every property as JSON lines
    List,

    /// Print the property at a zero-based position
    Show {
        index: String,
    },

    /// Print the first property with a matching id
    FindId {
        id: String,
    },

    /// Print properties whose name contains the text (case-insensitive)
    Search {
        name: String,
    },

    /// Print properties priced within [min, max]
    Price {
        #[arg(long, allow_hyphen_values = true)]
        min: String,

        #[arg(long, allow_hyphen_values = true)]
        max: String,
    },

    /// Print the web routes
    Routes,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    init_logging(&config);
    match Config::resolve_path(cli.config.as_deref()) {
        Some(path) => tracing::debug!("loaded config from {}", path.display()),
        None => tracing::debug!("no config file, using defaults and environment"),
    }

    match cli.command {
        Commands::Serve { bind, refresh } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(refresh) = refresh {
                config.dataset.refresh = refresh;
            }
            serve(config).await
        }
        Commands::List => {
            let snapshot = load(&config).await?;
            print_all(query::list_all(&snapshot).iter())
        }
        Commands::Show { index } => {
            let snapshot = load(&config).await?;
            let property = query::get_by_position(&snapshot, &index)
                .with_context(|| format!("index {:?} of {}", index, snapshot.len()))?;
            print_all([property])
        }
        Commands::FindId { id } => {
            let snapshot = load(&config).await?;
            let property = query::find_by_id(&snapshot, Some(&PropertyId::from(id.as_str())))
                .with_context(|| format!("id {:?}", id))?;
            print_all([property])
        }
        Commands::Search { name } => {
            let snapshot = load(&config).await?;
            let found = query::search_by_name(&snapshot, &name)?;
            if found.is_empty() {
                bail!("No properties found.");
            }
            print_all(found)
        }
        Commands::Price { min, max } => {
            let range = match validate_price_range(Some(min.as_str()), Some(max.as_str())) {
                Ok(range) => range,
                Err(errors) => {
                    for error in errors.iter() {
                        eprintln!("{}: {}", error.field, error.message);
                    }
                    bail!("invalid price range");
                }
            };
            let snapshot = load(&config).await?;
            print_all(query::filter_by_price(&snapshot, &range))
        }
        Commands::Routes => {
            bnb_web::routes::print_routes();
            Ok(())
        }
    }
}

fn init_logging(config: &Config) {
    let fallback = config
        .log
        .filter
        .clone()
        .unwrap_or_else(|| "bnb_cli=info,bnb_web=info,bnb_dataset=info,tower_http=info".into());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let registry = tracing_subscriber::registry().with(filter);

    if config.log.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn serve(config: Config) -> Result<()> {
    let state = AppState::from_config(&config).context("building dataset source")?;
    tracing::info!(
        "dataset: {} (refresh: {:?})",
        state.store.describe(),
        config.dataset.refresh
    );

    if config.dataset.refresh == RefreshPolicy::Startup {
        if let Err(e) = state.store.reload().await {
            tracing::warn!("initial dataset load failed, will retry on first request: {}", e);
        }
    }

    bnb_web::routes::print_routes();
    bnb_web::serve(Arc::new(state), &config.server.bind)
        .await
        .with_context(|| format!("serving on {}", config.server.bind))
}

async fn load(config: &Config) -> Result<Snapshot> {
    let store = DatasetStore::from_config(&config.dataset)?;
    store
        .reload()
        .await
        .with_context(|| format!("loading dataset from {}", store.describe()))
}

fn print_all<'a>(properties: impl IntoIterator<Item = &'a Property>) -> Result<()> {
    for property in properties {
        println!("{}", serde_json::to_string(property)?);
    }
    Ok(())
}
