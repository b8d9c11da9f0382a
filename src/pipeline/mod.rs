//! Standings pipeline: fetcher → locator → row walk → report.
//!
//! `run()` never fails: every outcome, including transport errors, comes
//! back as an [`ApiResponse`] with status OK or FAILED.
//!
//! `extract_standings()` is the synchronous half. It works on HTML that is
//! already in memory, so the same page always yields the same report.

use crate::error::StandingsError;
use crate::models::{ApiResponse, StandingsReport};
use crate::scraper::PageFetcher;
use crate::scraper::aggregator::{AcceptedSets, PROBLEM_COLUMN_OFFSET, problem_for_column};
use crate::scraper::cleaner::is_unsolved;
use crate::scraper::parsers::{
    cell_result, classify_row, locate_standings, parse_contest_meta, parse_problems, row_cells,
    table_rows,
};
use crate::utils::Timer;
use scraper::Html;
use std::sync::Arc;
use tracing::{error, info};

pub struct Pipeline {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn PageFetcher>, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn run(&self, url: &str) -> ApiResponse {
        info!("Fetching data from URL: {}", url);
        let res = self.run_inner(url).await;

        match &res {
            Ok(report) => info!(
                "{}: {} problems, {} contestants",
                report.contest.name,
                report.contest.problems.len(),
                report.contestants.len()
            ),
            Err(StandingsError::FetchUnavailable(e)) => error!("Error fetching page: {}", e),
            Err(e) => error!("Error processing data: {}", e),
        }

        res.into()
    }

    async fn run_inner(&self, url: &str) -> Result<StandingsReport, StandingsError> {
        let html = self
            .fetcher
            .fetch_page(url)
            .await
            .map_err(|e| StandingsError::FetchUnavailable(format!("{:#}", e)))?;

        let _t = Timer::start(format!("Extracting {}", url));
        extract_standings(&html, &self.base_url)
    }
}

/// Turn one standings page into per-contestant accepted problems.
pub fn extract_standings(html: &str, base_url: &str) -> Result<StandingsReport, StandingsError> {
    let doc = Html::parse_document(html);

    let standings = locate_standings(&doc)?;
    let rows = table_rows(standings);

    let problems = parse_problems(rows.first().copied(), base_url)?;
    let contest = parse_contest_meta(&doc, base_url, problems)?;

    // Row 0 is the header, the last row is the summary.
    let data_rows = rows.get(1..rows.len().saturating_sub(1)).unwrap_or_default();

    let mut accepted = AcceptedSets::new();
    for (i, row) in data_rows.iter().enumerate() {
        let cells = row_cells(*row);
        let party = classify_row(&cells).map_err(|e| match e {
            StandingsError::Structural(msg) => {
                StandingsError::Structural(format!("row {}: {}", i + 1, msg))
            }
            other => other,
        })?;

        let contestants = party.contestants();
        for (col, cell) in cells.iter().enumerate().skip(PROBLEM_COLUMN_OFFSET) {
            // Rows crediting nobody never consult the problem headers.
            if contestants.is_empty() || is_unsolved(&cell_result(*cell)) {
                continue;
            }
            let problem = problem_for_column(&contest.problems, col).ok_or_else(|| {
                StandingsError::structural(format!(
                    "row {}: column {} has no matching problem",
                    i + 1,
                    col
                ))
            })?;
            accepted.credit(contestants, problem);
        }
    }

    Ok(StandingsReport {
        contestants: accepted.finalize(),
        contest,
    })
}
