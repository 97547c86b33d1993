use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use youtube_insight::{
    create_router, Analyzers, AppState, ArtifactStore, Config, FileRenderer, JobManager, Pipeline,
    YouTubeClient,
};

#[derive(Debug, Parser)]
#[command(name = "youtube-insight", version, about = "YouTube transcript and comment analysis service")]
struct Args {
    /// Config file path, without extension
    #[arg(long, default_value = "config/youtube-insight")]
    config: String,

    /// Override the HTTP bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;
    if let Some(bind) = args.bind {
        cfg.service.http.bind = bind;
    }
    if let Some(port) = args.port {
        cfg.service.http.port = port;
    }

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Analysis backend: {:?}", cfg.analysis.backend);
    info!("Artifacts directory: {}", cfg.output.data_dir.display());

    let source = YouTubeClient::new(&cfg.youtube).context("Failed to create YouTube client")?;
    let analyzers =
        Analyzers::from_config(&cfg.analysis).context("Failed to create analyzers")?;
    let pipeline = Pipeline::new(
        Arc::new(source),
        analyzers,
        Arc::new(FileRenderer),
        ArtifactStore::new(&cfg.output.data_dir),
    )
    .with_max_comments(cfg.youtube.max_comments)
    .with_fetch_timeout(Duration::from_secs(cfg.pipeline.fetch_timeout_secs));

    let app = create_router(AppState::new(JobManager::new(pipeline)));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app).await.context("HTTP server error")?;

    Ok(())
}
