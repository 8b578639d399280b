use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::collect::Collector;
use crate::config::PipelineConfig;
use crate::dispatch::{DispatchSummary, Dispatcher};
use crate::errors::PipelineResult;
use crate::filter::TaglineFilter;
use crate::persist::Persister;
use crate::record::MatchSet;
use crate::render::ReportWriter;
use crate::source::RecordSource;

/// What happened to the match set at the end of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The matches were written to `path`
    Persisted { count: usize, path: PathBuf },
    /// Nothing matched; the persister was not called and the destination was left as is
    NoMatches,
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Records returned by the source
    pub fetched: usize,
    pub summary: DispatchSummary,
    pub matches: MatchSet,
    pub outcome: PersistOutcome,
}

impl PipelineReport {
    /// One-line, user-facing description of the outcome
    pub fn status_line(&self) -> String {
        match &self.outcome {
            PersistOutcome::Persisted { count, path } => format!(
                "Successfully persisted {} users to {}",
                count,
                path.display()
            ),
            PersistOutcome::NoMatches => "No users matched the filter criteria".to_string(),
        }
    }
}

/// Fetches, renders, filters and persists records in one run.
///
/// A retrieval failure aborts before anything is rendered. A persistence
/// failure is returned after every record has been rendered and filtered.
pub fn run_pipeline<S, P, W>(
    config: &PipelineConfig,
    source: &S,
    persister: &P,
    writer: &ReportWriter<W>,
) -> PipelineResult<PipelineReport>
where
    S: RecordSource + ?Sized,
    P: Persister + ?Sized,
    W: Write + Send,
{
    info!("Starting pipeline against {}", source.describe());

    let records = source.fetch_records()?;
    let fetched = records.len();
    debug!("Fetched {} records", fetched);

    let filter = TaglineFilter::new(&config.filter_pattern);
    let dispatcher = Dispatcher::new(config.thread_count)?;
    let (handoff, collector) = Collector::spawn()?;

    let summary = dispatcher.dispatch(records, &filter, writer, handoff);
    let matches = collector.finish()?;

    info!(
        "Processed {} records, {} matched {:?}",
        summary.completed,
        matches.len(),
        filter.needle()
    );

    let outcome = if matches.is_empty() {
        PersistOutcome::NoMatches
    } else {
        let path = persister.persist(&matches)?;
        PersistOutcome::Persisted {
            count: matches.len(),
            path,
        }
    };

    Ok(PipelineReport {
        fetched,
        summary,
        matches,
        outcome,
    })
}
