/// Gale CLI - search web catalogs and download tracks
mod output;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use gale_core::{GaleConfig, ProviderName};
use gale_download::{DownloadJob, DownloadOrchestrator, DownloadProgress};
use gale_providers::{HttpClient, ProviderRegistry};
use gale_search::{SearchCoordinator, SearchOutcome, SearchResults, SearchScope};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gale")]
#[command(about = "Search SoundCloud and YouTube, resolve links and download tracks", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "GALE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search all enabled providers, or resolve a track/playlist URL
    Search {
        /// Free text or a provider URL
        query: String,
        /// Only search this provider (soundcloud, youtube)
        #[arg(short, long)]
        provider: Option<ProviderName>,
        /// Maximum number of results to print
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Resolve a URL and download every downloadable track it yields
    Download {
        /// Track, playlist or user URL
        url: String,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gale=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = GaleConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Search {
            query,
            provider,
            limit,
        } => search(&config, &query, provider, limit).await,
        Commands::Download { url, output } => download(&config, &url, &output).await,
    }
}

fn coordinator(config: &GaleConfig) -> anyhow::Result<SearchCoordinator> {
    let registry = ProviderRegistry::from_config(config).context("Failed to build HTTP client")?;
    if registry.enabled().is_empty() {
        bail!(
            "No provider is enabled; set providers.soundcloud.client_id or providers.youtube.api_key"
        );
    }
    Ok(SearchCoordinator::new(registry, config.search.clone()))
}

async fn run_search(
    coordinator: &SearchCoordinator,
    query: &str,
    scope: SearchScope,
) -> anyhow::Result<SearchResults> {
    match coordinator.start_search(query, scope).await? {
        SearchOutcome::Completed(results) => Ok(results),
        SearchOutcome::Canceled => bail!("Search was canceled"),
    }
}

async fn search(
    config: &GaleConfig,
    query: &str,
    provider: Option<ProviderName>,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let coordinator = coordinator(config)?;
    let scope = match provider {
        Some(name) => SearchScope::Only(name),
        None => SearchScope::from(config.search.scope),
    };

    let results = run_search(&coordinator, query, scope).await?;
    print!("{}", output::render_results(&results, limit));

    for failure in results.auth_failures() {
        tracing::error!(provider = %failure.provider, "Check the credentials for this provider");
    }

    Ok(())
}

async fn download(config: &GaleConfig, url: &str, output: &Path) -> anyhow::Result<()> {
    let coordinator = coordinator(config)?;
    let results = run_search(&coordinator, url, SearchScope::All).await?;
    if !results.is_url_resolution() {
        bail!("{url} is not a track, playlist or user URL of an enabled provider");
    }

    let http = HttpClient::new(&config.http).context("Failed to build HTTP client")?;
    let orchestrator = DownloadOrchestrator::new(
        coordinator.registry().clone(),
        http,
        config.download.clone(),
    )
    .on_progress(Box::new(|progress: &DownloadProgress| {
        tracing::debug!(
            received = progress.bytes_received,
            total = ?progress.bytes_total,
            "Downloading"
        );
    }));

    let (downloadable, skipped): (Vec<_>, Vec<_>) = results
        .tracks
        .into_iter()
        .partition(|track| orchestrator.is_downloadable(track));

    for track in &skipped {
        println!("skipped: {} (not downloadable)", track.title);
    }

    let mut failed = 0usize;
    for track in downloadable {
        let title = track.title.clone();
        match orchestrator.download(&DownloadJob::into_dir(track, output)).await {
            Ok(path) => println!("saved: {}", path.display()),
            Err(e) => {
                failed += 1;
                tracing::error!(title = %title, error = %e, "Download failed");
            }
        }
    }

    if failed > 0 {
        bail!("{failed} download(s) failed");
    }
    Ok(())
}
