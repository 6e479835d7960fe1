//! rustjournals - Journal RSS aggregator
//!
//! Pulls recent articles from journal feeds into a deduplicated CSV archive
//! and offers filtered views and LLM summaries over it.
//!
//! ## Usage
//!
//! ### Fetch cycle (default command)
//! ```bash
//! rustjournals
//! rustjournals fetch --days 30 --archive articles.csv
//! ```
//!
//! ### Browse the archive
//! ```bash
//! rustjournals list --range last-30-days --topic Leadership --sort journal
//! rustjournals summarize --topic Wellbeing --llm-key $KEY
//! ```
//!
//! ### HTTP Server Mode
//! ```bash
//! rustjournals serve --port 3000
//! ```

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use rustjournals::{
    archive::{Archive, DEFAULT_ARCHIVE_PATH},
    doi,
    fetcher::{self, FeedFetcher, DEFAULT_LOOKBACK_DAYS},
    registry,
    summarize::{self, SummaryConfig, DEFAULT_BASE_URL, DEFAULT_MODEL},
    view::{split_list, ArticleFilter, DateRange, SortOrder, ViewSummary},
    Article,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Journal RSS aggregator with abstract scraping and a deduplicated archive
#[derive(Parser)]
#[command(name = "rustjournals")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Archive CSV file
    #[arg(long, global = true, default_value = DEFAULT_ARCHIVE_PATH)]
    archive: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch recent articles from every feed and merge them into the archive
    Fetch {
        /// Lookback window in days
        #[arg(long, default_value_t = DEFAULT_LOOKBACK_DAYS)]
        days: i64,

        /// JSON feed registry (defaults to the built-in journal list)
        #[arg(long)]
        feeds: Option<PathBuf>,
    },

    /// List archived articles
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Maximum number of articles to print
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Summarise matching articles with an LLM
    Summarize {
        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        llm: LlmArgs,
    },

    /// Run as HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[command(flatten)]
        llm: LlmArgs,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Date range: last-week, last-30-days, last-90-days, last-6-months, last-12-months, last-2-years, all-time
    #[arg(long, default_value = "all-time")]
    range: DateRange,

    /// Journals (comma-separated, exact names)
    #[arg(long)]
    journal: Option<String>,

    /// Topics (comma-separated, case-insensitive)
    #[arg(long)]
    topic: Option<String>,

    /// Search title or abstract
    #[arg(short, long)]
    query: Option<String>,

    /// Sort order: newest, oldest, journal, title
    #[arg(long, default_value = "newest")]
    sort: SortOrder,
}

impl From<FilterArgs> for ArticleFilter {
    fn from(args: FilterArgs) -> Self {
        ArticleFilter {
            range: args.range,
            journals: split_list(args.journal.as_deref()),
            topics: split_list(args.topic.as_deref()),
            search: args.query,
            sort: args.sort,
        }
    }
}

#[derive(Args)]
struct LlmArgs {
    /// LLM API base URL (OpenAI-compatible)
    #[arg(long, env = "LLM_BASE_URL", default_value = DEFAULT_BASE_URL)]
    llm_base_url: String,

    /// LLM API key
    #[arg(long, env = "LLM_API_KEY", hide_env_values = true)]
    llm_key: Option<String>,

    /// LLM model name
    #[arg(long, env = "LLM_MODEL", default_value = DEFAULT_MODEL)]
    llm_model: String,
}

impl LlmArgs {
    fn into_config(self) -> Option<SummaryConfig> {
        self.llm_key
            .filter(|key| !key.trim().is_empty())
            .map(|api_key| SummaryConfig {
                base_url: self.llm_base_url,
                api_key,
                model: self.llm_model,
            })
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    let archive = Archive::new(cli.archive);

    match cli.command {
        None => run_fetch(&archive, DEFAULT_LOOKBACK_DAYS, None).await,
        Some(Commands::Fetch { days, feeds }) => run_fetch(&archive, days, feeds).await,
        Some(Commands::List { filter, limit }) => run_list(&archive, filter.into(), limit),
        Some(Commands::Summarize { filter, llm }) => run_summarize(&archive, filter.into(), llm).await,
        Some(Commands::Serve { port, host, llm }) => run_server(host, port, archive, llm.into_config()).await,
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ============================================================================
// Fetch Cycle
// ============================================================================

async fn run_fetch(archive: &Archive, days: i64, feeds: Option<PathBuf>) -> Result<()> {
    let sources = match feeds {
        Some(path) => registry::load_registry(&path)
            .with_context(|| format!("Failed to load feed registry {}", path.display()))?,
        None => registry::default_registry(),
    };

    let cutoff = fetcher::cutoff_for(Utc::now(), days).context("Invalid --days value")?;
    println!("Fetching articles published after {}...", cutoff.format("%Y-%m-%d"));

    let fetcher = FeedFetcher::new().context("Failed to set up HTTP clients")?;
    let articles = fetcher.fetch_recent_articles(&sources, cutoff).await;

    if articles.is_empty() {
        println!("No new articles found in the given timeframe.");
        return Ok(());
    }

    let fetched = articles.len();
    match archive.merge(articles).context("Failed to update archive")? {
        Some(total) => {
            info!(fetched = fetched, total = total, path = %archive.path().display(), "Fetch cycle complete");
            println!("Success! Database updated. It now contains {} total articles.", total);
        }
        None => println!("No new articles found in the given timeframe."),
    }
    Ok(())
}

// ============================================================================
// Archive Views
// ============================================================================

fn load_filtered(archive: &Archive, filter: &ArticleFilter) -> Result<Vec<Article>> {
    let articles = archive.load().context("Failed to load archive")?;
    Ok(filter.apply(&articles, today()).into_iter().cloned().collect())
}

fn print_header(articles: &[Article]) {
    let refs: Vec<&Article> = articles.iter().collect();
    let summary = ViewSummary::of(&refs);
    println!("Results: {} Articles", summary.count);
    if let (Some(earliest), Some(latest)) = (summary.earliest, summary.latest) {
        println!(
            "Sourced articles from {} - {}",
            earliest.format("%d/%m/%Y"),
            latest.format("%d/%m/%Y")
        );
    }
}

fn run_list(archive: &Archive, filter: ArticleFilter, limit: Option<usize>) -> Result<()> {
    let articles = load_filtered(archive, &filter)?;
    print_header(&articles);

    for article in articles.iter().take(limit.unwrap_or(usize::MAX)) {
        println!();
        println!("{}", article.title);
        println!("  Link:      {}", article.link);
        println!("  Journal:   {}", article.journal);
        println!("  Published: {}", article.published_date.format("%Y-%m-%d"));
        if doi::is_resolved(&article.doi) {
            println!("  DOI:       https://doi.org/{}", article.doi);
        }
        println!("  Topics:    {}", article.topics_label());
    }
    Ok(())
}

async fn run_summarize(archive: &Archive, filter: ArticleFilter, llm: LlmArgs) -> Result<()> {
    let Some(config) = llm.into_config() else {
        anyhow::bail!("Please provide an LLM API key (--llm-key or LLM_API_KEY)");
    };

    let articles = load_filtered(archive, &filter)?;
    print_header(&articles);
    if articles.is_empty() {
        println!("No articles to summarize.");
        return Ok(());
    }

    let refs: Vec<&Article> = articles.iter().collect();
    println!("Summarizing with {}...", config.model);
    match summarize::generate_summary(&config, &refs).await {
        Ok(text) => {
            println!("\n{}", text);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Summary failed");
            anyhow::bail!("An error occurred while talking to the LLM: {}", e)
        }
    }
}

// ============================================================================
// HTTP Server
// ============================================================================

async fn run_server(host: String, port: u16, archive: Archive, llm: Option<SummaryConfig>) -> Result<()> {
    info!(host = %host, port = port, archive = %archive.path().display(), "Starting HTTP server");
    println!("Starting server at http://{}:{}", host, port);

    let app_state = Arc::new(AppState { archive, llm });

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/articles", get(articles_handler))
        .route("/summary", post(summary_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid host:port")?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}

struct AppState {
    archive: Archive,
    llm: Option<SummaryConfig>,
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Article query parameters; list values are comma-separated
#[derive(Debug, Deserialize)]
struct ArticlesQuery {
    range: Option<String>,
    journal: Option<String>,
    topic: Option<String>,
    q: Option<String>,
    sort: Option<String>,
}

impl ArticlesQuery {
    fn into_filter(self) -> std::result::Result<ArticleFilter, String> {
        Ok(ArticleFilter {
            range: self.range.as_deref().unwrap_or_default().parse()?,
            journals: split_list(self.journal.as_deref()),
            topics: split_list(self.topic.as_deref()),
            search: self.q,
            sort: self.sort.as_deref().unwrap_or_default().parse()?,
        })
    }
}

/// Articles response
#[derive(Debug, Serialize)]
struct ArticlesResponse {
    status: String,
    count: usize,
    earliest: Option<NaiveDate>,
    latest: Option<NaiveDate>,
    results: Vec<Article>,
}

impl ArticlesResponse {
    fn error(message: String) -> Self {
        Self {
            status: format!("error: {}", message),
            count: 0,
            earliest: None,
            latest: None,
            results: vec![],
        }
    }
}

/// Filtered archive endpoint
async fn articles_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ArticlesQuery>,
) -> Json<ArticlesResponse> {
    let filter = match query.into_filter() {
        Ok(filter) => filter,
        Err(e) => return Json(ArticlesResponse::error(e)),
    };

    match state.archive.load() {
        Ok(articles) => {
            let selected = filter.apply(&articles, today());
            let summary = ViewSummary::of(&selected);
            Json(ArticlesResponse {
                status: "success".to_string(),
                count: summary.count,
                earliest: summary.earliest,
                latest: summary.latest,
                results: selected.into_iter().cloned().collect(),
            })
        }
        Err(e) => {
            error!(error = %e, "Archive load failed");
            Json(ArticlesResponse::error(e.to_string()))
        }
    }
}

/// Summary response
#[derive(Debug, Serialize)]
struct SummaryResponse {
    status: String,
    summary: Option<String>,
}

/// Summary endpoint handler
async fn summary_handler(
    State(state): State<Arc<AppState>>,
    Json(filter): Json<ArticleFilter>,
) -> Json<SummaryResponse> {
    let failure = |message: String| {
        Json(SummaryResponse {
            status: format!("error: {}", message),
            summary: None,
        })
    };

    let Some(config) = state.llm.as_ref() else {
        return failure("LLM API key is not configured".to_string());
    };

    let articles = match state.archive.load() {
        Ok(articles) => articles,
        Err(e) => return failure(e.to_string()),
    };
    let selected = filter.apply(&articles, today());

    info!(count = selected.len(), "Summary request");
    match summarize::generate_summary(config, &selected).await {
        Ok(text) => Json(SummaryResponse {
            status: "success".to_string(),
            summary: Some(text),
        }),
        Err(e) => {
            error!(error = %e, "Summary failed");
            failure(e.to_string())
        }
    }
}
