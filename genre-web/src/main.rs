//! genre-web - Book genre prediction service
//!
//! Loads the fitted artifacts once at startup, then serves a single page
//! where a book summary can be submitted for genre prediction.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use genre_common::artifacts::ArtifactLoader;
use genre_common::config::{default_config_path, Config, ConfigOverrides, TomlConfig};
use genre_common::PredictionPipeline;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use genre_web::{build_router, AppState};

/// Command-line arguments for genre-web
#[derive(Parser, Debug)]
#[command(name = "genre-web")]
#[command(about = "Book genre prediction from a free-text summary")]
#[command(version)]
struct Args {
    /// TOML config file (default: platform config dir)
    #[arg(short, long, env = "GENRE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "GENRE_BIND")]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "GENRE_PORT")]
    port: Option<u16>,

    /// Directory holding the classifier, vectorizer and label encoder files
    #[arg(short, long, env = "GENRE_ARTIFACT_DIR")]
    artifact_dir: Option<PathBuf>,

    /// Stopword list replacing the bundled English one
    #[arg(long, env = "GENRE_STOPWORDS")]
    stopwords: Option<PathBuf>,

    /// Lemma dictionary replacing the bundled English one
    #[arg(long, env = "GENRE_LEMMAS")]
    lemmas: Option<PathBuf>,

    /// Normalization cache entries (0 disables)
    #[arg(long, env = "GENRE_CACHE_SIZE")]
    cache_size: Option<usize>,

    /// Log level when RUST_LOG is unset
    #[arg(long, env = "GENRE_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind_address: self.bind.clone(),
            port: self.port,
            artifact_dir: self.artifact_dir.clone(),
            stopwords_path: self.stopwords.clone(),
            lemmas_path: self.lemmas.clone(),
            normalization_cache_size: self.cache_size,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // An explicitly named config file must exist; the default one may not
    let config_path = args.config.clone().or_else(default_config_path);
    let toml = match (&args.config, &config_path) {
        (Some(path), _) => Some(TomlConfig::load(path)?),
        (None, Some(path)) => TomlConfig::load_optional(path)?,
        (None, None) => None,
    };
    let found_config = toml.is_some();
    let config = Config::resolve(args.overrides(), toml);

    // Initialize tracing; RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "genre_web={level},genre_common={level},tower_http={level}",
                level = config.log_level
            ))
        }))
        .init();

    info!(
        "Starting Book Genre Prediction (genre-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match (&config_path, found_config) {
        (Some(path), true) => info!("Config file: {}", path.display()),
        (Some(path), false) => warn!("Config file {} not found, using defaults", path.display()),
        (None, _) => warn!("No config directory on this platform, using defaults"),
    }

    let normalizer = config
        .build_normalizer()
        .context("Failed to load linguistic resources")?;
    info!(
        "Normalizer ready ({} stopwords{}{})",
        normalizer.stopwords().len(),
        if config.stopwords_path.is_some() { ", custom list" } else { "" },
        if config.lemmas_path.is_some() { ", custom lemmas" } else { "" }
    );

    // Artifacts are loaded exactly once; failure here means we cannot serve
    let loader = ArtifactLoader::new(config.artifact_paths());
    info!("Classifier: {}", loader.paths().classifier.display());
    info!("Vectorizer: {}", loader.paths().vectorizer.display());
    info!("Label encoder: {}", loader.paths().label_encoder.display());
    let artifacts = loader
        .get_or_load()
        .context("Failed to load model artifacts")?;

    let pipeline = PredictionPipeline::new(normalizer, artifacts)
        .with_cache_capacity(config.normalization_cache_size);
    info!("Known genres: {}", pipeline.genres().join(", "));

    let state = AppState::new(Arc::new(pipeline));
    let app = build_router(state);

    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("genre-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
