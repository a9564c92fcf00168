use crate::error::{IngestError, Result};

/// Outcome counters for one collection run. `skipped` matches have been
/// appended to the skip log; `distribution` tallies the classification of
/// every canonical row produced, written or not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub processed: usize,
    pub skipped: usize,
    pub rows_written: usize,
    pub distribution: analysis::audit::Distribution,
}

/// Ingest one match page end to end. Any failure before canonical rows exist
/// routes the URL to the skip log and counts the match as skipped; the run
/// itself continues. A failed row write is logged and dropped without
/// affecting the remaining rows.
#[tracing::instrument(skip(fetcher, store, skip_log, event, report))]
pub async fn ingest_match(
    fetcher: &crate::fetch::Fetcher,
    store: &mut crate::store::Store,
    skip_log: &crate::skiplog::SkipLog,
    url: &str,
    event: Option<&crate::config::EventEntry>,
    report: &mut RunReport,
) -> Result<()> {
    match try_ingest_match(fetcher, store, url, event, report).await {
        Ok(()) => {
            report.processed += 1;
        }
        Err(e) => {
            tracing::error!("Failed to ingest {}: {}", url, e);
            skip_log.append(url)?;
            report.skipped += 1;
        }
    }

    Ok(())
}

async fn try_ingest_match(
    fetcher: &crate::fetch::Fetcher,
    store: &mut crate::store::Store,
    url: &str,
    event: Option<&crate::config::EventEntry>,
    report: &mut RunReport,
) -> Result<()> {
    let match_id = crate::extract::match_id_from_url(url).ok_or(IngestError::Structure {
        context: "match id segment in url",
    })?;

    let html = fetcher.fetch(url).await?;
    let mut document = crate::extract::parse_match(&html)?;

    if let Some(event) = event {
        document.event_id = Some(event.event_id.clone());
        document.event_name = Some(event.event_name.clone());
    }

    let rows = crate::normalize::canonical_rows(&document, &match_id);

    let mut written = 0;
    for row in rows {
        report.distribution.record(row.game_type);

        match store.upsert(crate::models::MapStatRow::from(row)) {
            Ok(()) => written += 1,
            Err(e) => {
                tracing::error!("Failed to store row for match {}: {}", match_id, e);
            }
        }
    }
    report.rows_written += written;

    tracing::info!("Stored {} rows for match {}", written, match_id);

    Ok(())
}

/// Walk the results listing from `start_page`, ingesting every match linked
/// there. Stops at the first page that fails to load or lists no matches.
/// Listing pages repeat matches near page boundaries, so ids already handled
/// in this run are not fetched again.
pub async fn scrape_results(
    fetcher: &crate::fetch::Fetcher,
    store: &mut crate::store::Store,
    skip_log: &crate::skiplog::SkipLog,
    start_page: u32,
) -> Result<RunReport> {
    let mut report = RunReport::default();
    let mut seen = std::collections::HashSet::new();

    let mut page = start_page;
    loop {
        tracing::info!("Scraping results page {}", page);

        let html = match fetcher.fetch(&crate::fetch::results_page_url(page)).await {
            Ok(html) => html,
            Err(e) => {
                tracing::info!("Stopping page walk: {}", e);
                break;
            }
        };

        let links = crate::extract::result_links(&html)?;
        if links.is_empty() {
            tracing::info!("No matches found on page {}, stopping", page);
            break;
        }

        for href in links {
            let match_id = match crate::extract::match_id_from_url(&href) {
                Some(id) => id,
                None => continue,
            };
            if !seen.insert(match_id) {
                continue;
            }

            let url = crate::fetch::match_url_from_href(&href);
            ingest_match(fetcher, store, skip_log, &url, None, &mut report).await?;
        }

        page += 1;
    }

    Ok(report)
}

/// Ingest every match of every configured event. A failing event is logged
/// and the remaining events still run; match failures inside an event are
/// handled per match as usual.
pub async fn scrape_events(
    fetcher: &crate::fetch::Fetcher,
    store: &mut crate::store::Store,
    skip_log: &crate::skiplog::SkipLog,
    events: &[crate::config::EventEntry],
) -> Result<RunReport> {
    let mut report = RunReport::default();

    for event in events {
        tracing::info!("Processing event: {} ({})", event.event_name, event.event_id);

        let list_url = crate::fetch::event_matches_url(&event.event_id);
        let match_ids = fetcher
            .fetch(&list_url)
            .await
            .and_then(|html| crate::extract::event_match_ids(&html));
        let match_ids = match match_ids {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!("Failed to process event {}: {}", event.event_id, e);
                continue;
            }
        };

        for match_id in match_ids {
            let url = crate::fetch::match_url(&match_id);
            ingest_match(fetcher, store, skip_log, &url, Some(event), &mut report).await?;
        }
    }

    Ok(report)
}

/// Re-ingest everything in the skip log. The log is drained up front and
/// failures re-append through the normal per-match handling, leaving the log
/// with exactly the still-failing URLs.
pub async fn retry_skipped(
    fetcher: &crate::fetch::Fetcher,
    store: &mut crate::store::Store,
    skip_log: &crate::skiplog::SkipLog,
) -> Result<RunReport> {
    let urls = skip_log.drain()?;
    tracing::info!("Retrying {} skipped matches", urls.len());

    let mut report = RunReport::default();
    for url in urls {
        ingest_match(fetcher, store, skip_log, &url, None, &mut report).await?;
    }

    Ok(report)
}
