use clap::Parser;
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;

#[derive(Debug, Parser)]
#[command(name = "ingest", about = "Collects per-map Valorant match statistics from vlr.gg")]
struct Cli {
    /// SQLite file backing the match-stats store.
    #[arg(long, default_value = "data/match_stats.db")]
    database: std::path::PathBuf,

    /// Log of match URLs that failed to ingest.
    #[arg(long, default_value = ingest::skiplog::DEFAULT_SKIP_LOG)]
    skip_log: std::path::PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Walk the results listing and ingest every finished match.
    Scrape {
        /// Listing page to start from.
        #[arg(long, default_value_t = 1)]
        start_page: u32,
    },
    /// Ingest all matches of the configured events.
    Events {
        /// Events file listing the event ids and names to collect.
        #[arg(long, default_value = ingest::config::DEFAULT_EVENTS_CONFIG)]
        config: std::path::PathBuf,
    },
    /// Re-ingest the matches currently in the skip log.
    Retry,
    /// Rewrite the skip log keeping one entry per URL.
    Dedup,
    /// Check the stored game-type distribution for anomalies.
    Audit,
    /// Report row, match and event counts for the store.
    Summary,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let registry = tracing_subscriber::Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target().contains("ingest")
        }));
    tracing::subscriber::set_global_default(registry).unwrap();

    let cli = Cli::parse();

    tracing::info!("Starting...");

    if let Err(e) = run(cli).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> ingest::Result<()> {
    match cli.command {
        Command::Scrape { start_page } => {
            let mut store = open_store(&cli.database).await?;
            let fetcher = ingest::fetch::Fetcher::new()?;
            let skip_log = ingest::skiplog::SkipLog::new(&cli.skip_log);

            let report =
                ingest::runner::scrape_results(&fetcher, &mut store, &skip_log, start_page).await?;
            report_run(&report);
        }
        Command::Events { config } => {
            let events = ingest::config::load_events(&config)?;
            tracing::info!("Loaded {} events from {}", events.len(), config.display());

            let mut store = open_store(&cli.database).await?;
            let fetcher = ingest::fetch::Fetcher::new()?;
            let skip_log = ingest::skiplog::SkipLog::new(&cli.skip_log);

            let report =
                ingest::runner::scrape_events(&fetcher, &mut store, &skip_log, &events).await?;
            report_run(&report);
        }
        Command::Retry => {
            let mut store = open_store(&cli.database).await?;
            let fetcher = ingest::fetch::Fetcher::new()?;
            let skip_log = ingest::skiplog::SkipLog::new(&cli.skip_log);

            let report = ingest::runner::retry_skipped(&fetcher, &mut store, &skip_log).await?;
            report_run(&report);
        }
        Command::Dedup => {
            let skip_log = ingest::skiplog::SkipLog::new(&cli.skip_log);
            let unique = skip_log.dedup()?;
            tracing::info!("Skip log deduplicated to {} unique URLs", unique);
        }
        Command::Audit => {
            let mut store = open_store(&cli.database).await?;
            let dist = store.game_type_distribution()?;
            report_distribution(&dist);
        }
        Command::Summary => {
            let mut store = open_store(&cli.database).await?;
            let summary = store.summary()?;
            tracing::info!(
                "{} rows across {} matches and {} events",
                summary.rows,
                summary.matches,
                summary.events
            );
        }
    }

    Ok(())
}

async fn open_store(database: &std::path::Path) -> ingest::Result<ingest::store::Store> {
    if let Some(parent) = database.parent() {
        if !parent.as_os_str().is_empty()
            && !tokio::fs::try_exists(parent).await.unwrap_or(false)
        {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let mut store = ingest::store::Store::open(&database.display().to_string())?;

    tracing::info!("Applying Migrations");
    store.migrate()?;
    tracing::info!("Completed Migrations");

    Ok(store)
}

fn report_run(report: &ingest::runner::RunReport) {
    tracing::info!(
        "Run complete: {} matches processed, {} skipped, {} rows written",
        report.processed,
        report.skipped,
        report.rows_written
    );
    report_distribution(&report.distribution);
}

fn report_distribution(dist: &analysis::audit::Distribution) {
    tracing::info!(
        "Distribution: {} playoffs, {} regular season, {} excluded",
        dist.playoffs,
        dist.regular,
        dist.excluded
    );
    for warning in analysis::audit::audit(dist) {
        tracing::warn!("{}", warning);
    }
}
