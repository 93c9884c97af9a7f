use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use newswire_client::ReqwestNewsClient;
use newswire_core::params::{API_BASE_URL, Language, SortBy, parse_instant};
use newswire_core::traits::{ApiKeySource, NewsClient};
use newswire_core::{
    HeadlinesParams, IngestionJob, ListParams, ParamSet, StaticApiKey, SystemClock,
    UPSTREAM_TIMEOUT, default_top_queries, get_within, load_top_queries,
};
use newswire_db::{Database, DatabaseConfig};

#[derive(Parser)]
#[command(name = "newswire", version, about = "News API proxy and ingestion tool")]
struct Cli {
    #[command(flatten)]
    upstream: UpstreamArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct UpstreamArgs {
    /// Upstream API key
    #[arg(long, global = true, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Upstream API base URL
    #[arg(
        long,
        global = true,
        env = "NEWSWIRE_UPSTREAM_BASE_URL",
        default_value = API_BASE_URL
    )]
    base_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every curated query once and store the articles
    Ingest {
        /// JSON file with the curated table (defaults to the built-in one)
        #[arg(short, long)]
        queries: Option<PathBuf>,
    },

    /// Search all articles
    Everything {
        /// Keywords or phrase to search for
        #[arg(short, long, default_value = "")]
        query: String,

        /// Comma-separated source ids
        #[arg(long, default_value = "")]
        sources: String,

        /// Comma-separated domains
        #[arg(long, default_value = "")]
        domains: String,

        /// Oldest article allowed (ISO 8601)
        #[arg(long, value_parser = parse_instant)]
        from: Option<DateTime<Utc>>,

        /// Newest article allowed (ISO 8601)
        #[arg(long, value_parser = parse_instant)]
        to: Option<DateTime<Utc>>,

        /// 2-letter ISO-639-1 code
        #[arg(short, long)]
        language: Option<Language>,

        /// relevancy, popularity or publishedAt
        #[arg(long)]
        sort_by: Option<SortBy>,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Top headlines by country, category or source
    Headlines {
        /// 2-letter ISO 3166-1 code
        #[arg(short, long, default_value = "")]
        country: String,

        #[arg(long, default_value = "")]
        category: String,

        /// Comma-separated source ids
        #[arg(long, default_value = "")]
        sources: String,

        /// Keywords or phrase to search for
        #[arg(short, long, default_value = "")]
        query: String,

        #[command(flatten)]
        paging: PagingArgs,
    },
}

#[derive(Args)]
struct PagingArgs {
    /// Results per page, at most 100
    #[arg(long, default_value_t = 0)]
    page_size: u32,

    #[arg(long, default_value_t = 0)]
    page: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("newswire=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let keys = match cli.upstream.api_key {
        Some(key) => StaticApiKey::new(key),
        None => StaticApiKey::missing(),
    };
    let client = ReqwestNewsClient::with_base_url(&cli.upstream.base_url)?;

    match cli.command {
        Commands::Ingest { queries } => cmd_ingest(client, keys, queries).await?,
        Commands::Everything {
            query,
            sources,
            domains,
            from,
            to,
            language,
            sort_by,
            paging,
        } => {
            let params = ListParams {
                query,
                sources,
                domains,
                from,
                to,
                language,
                sort_by,
                page_size: paging.page_size,
                page: paging.page,
            };
            cmd_query(&client, &keys, &params).await?;
        }
        Commands::Headlines {
            country,
            category,
            sources,
            query,
            paging,
        } => {
            let params = HeadlinesParams {
                country,
                category,
                sources,
                query,
                page_size: paging.page_size,
                page: paging.page,
            };
            cmd_query(&client, &keys, &params).await?;
        }
    }

    Ok(())
}

/// Connect to PostgreSQL and apply migrations.
async fn connect_db() -> Result<Database> {
    let config = DatabaseConfig::from_env()?;
    let db = Database::connect(&config)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await?;
    Ok(db)
}

async fn cmd_ingest(
    client: ReqwestNewsClient,
    keys: StaticApiKey,
    queries: Option<PathBuf>,
) -> Result<()> {
    let top_queries = match queries {
        Some(path) => load_top_queries(&path)?,
        None => default_top_queries(),
    };
    let db = connect_db().await?;

    let job = IngestionJob::new(client, db.store(), keys, SystemClock).with_top_queries(top_queries);
    let log = job.ingest().await?;

    print_json(&log)?;
    db.close().await;
    Ok(())
}

async fn cmd_query<C, K, P>(client: &C, keys: &K, params: &P) -> Result<()>
where
    C: NewsClient,
    K: ApiKeySource,
    P: ParamSet,
{
    let api_key = keys.api_key()?;
    let response = get_within(client, &api_key, params, UPSTREAM_TIMEOUT).await?;
    tracing::info!(
        endpoint = %params.endpoint(),
        articles = response.articles.len(),
        total = response.total_results,
        "Query complete"
    );
    print_json(&response)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
