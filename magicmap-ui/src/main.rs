//! magicmap-ui - Magic Map service
//!
//! Serves the front page and the JSON API on localhost. Requires a Gemini API
//! key (database setting, `MAGICMAP_API_KEY`/`API_KEY`, or `config.toml`).

use anyhow::{Context, Result};
use clap::Parser;
use magicmap_common::config::{
    default_config_path, load_toml_config_or_default, CompiledDefaults, RootFolderInitializer,
    RootFolderResolver,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use magicmap_ui::services::{workflow, GeminiClient, TcpProbe};
use magicmap_ui::{build_router, config, db, AppState};

/// Command-line arguments for magicmap-ui
#[derive(Parser, Debug)]
#[command(name = "magicmap-ui")]
#[command(about = "Turns notes into tree, timeline, storyboard, and character maps")]
#[command(version)]
struct Args {
    /// Root folder holding the database (overrides MAGICMAP_ROOT_FOLDER)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "MAGICMAP_PORT")]
    port: Option<u16>,

    /// Path to config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let defaults = CompiledDefaults::for_current_platform();

    // Read before logging starts: the file may set the log level
    let config_path = args.config.clone().or_else(default_config_path);
    let (toml_config, config_problem) = load_toml_config_or_default(config_path.as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(defaults.resolve_log_level(&toml_config))
            }),
        )
        .init();

    info!(
        "Starting Magic Map (magicmap-ui) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if let (Some(path), Some(problem)) = (&config_path, &config_problem) {
        warn!("Ignoring config file {}: {}", path.display(), problem);
    }

    let root_folder = RootFolderResolver::new(args.root_folder.clone(), toml_config.clone()).resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;

    let db_path = initializer.database_path();
    info!("Database: {}", db_path.display());
    let pool = db::init_database(&db_path)
        .await
        .context("Failed to open database")?;
    info!("✓ Database ready");

    let api_key = match config::resolve_api_key(&pool, &toml_config).await {
        Ok(key) => key,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };
    let model = config::resolve_model(&toml_config, &defaults);
    let mut generator = GeminiClient::new(api_key, model).context("Failed to create Gemini client")?;
    if let Some(base_url) = toml_config.api_base_url.as_deref() {
        generator = generator.with_base_url(base_url);
    }
    info!("Generative model: {} at {}", generator.model(), generator.base_url());

    // Connectivity is checked against the host the client talks to
    let probe = TcpProbe::for_endpoint(generator.base_url()).unwrap_or_else(|| {
        warn!("Cannot derive a probe address from {}; using the default host", generator.base_url());
        TcpProbe::default()
    });

    let state = AppState::new(pool, Arc::new(generator), Arc::new(probe));
    workflow::refresh_saved_flag(&state).await;
    let app = build_router(state);

    let (bind_address, port) = defaults.resolve_listen_address(args.port, &toml_config);
    let listener = tokio::net::TcpListener::bind((bind_address.as_str(), port)).await?;
    info!("magicmap-ui listening on http://{}:{}", bind_address, port);
    info!("Health check: http://{}:{}/health", bind_address, port);

    axum::serve(listener, app).await?;

    Ok(())
}
