use rayon::{ThreadPool, ThreadPoolBuilder};
use std::io::Write;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::SyncSender;
use tracing::{debug, info, trace, warn};

use crate::errors::PipelineResult;
use crate::filter::RecordFilter;
use crate::metrics::PipelineMetrics;
use crate::record::Record;
use crate::render::ReportWriter;

/// Counts gathered over one call to [`Dispatcher::dispatch`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Units spawned, one per record
    pub dispatched: usize,
    /// Units that finished rendering and filtering
    pub completed: usize,
    /// Units whose record satisfied the filter
    pub matched: usize,
}

impl DispatchSummary {
    pub fn is_complete(&self) -> bool {
        self.dispatched == self.completed
    }
}

/// Spawns one unit per record on a dedicated worker pool.
///
/// A unit renders its record to the shared report stream, evaluates the filter,
/// and on a match hands the record to the collector through a rendezvous
/// channel:
///
/// ```rust,ignore
/// let (handoff, collector) = Collector::spawn()?;
/// let summary = dispatcher.dispatch(records, &filter, &writer, handoff);
/// let matches = collector.finish()?;
/// ```
///
/// # Completion
///
/// `ThreadPool::scope` does not return until every unit spawned inside it has
/// finished, so it serves as the wait-for-N barrier. Each unit owns a clone of
/// the handoff sender; the dispatcher's own sender is dropped only after the
/// scope has joined. The channel therefore closes exactly when the last unit is
/// done and the collector can never finalize early.
#[derive(Debug)]
pub struct Dispatcher {
    pool: ThreadPool,
    metrics: PipelineMetrics,
}

impl Dispatcher {
    /// Creates a dispatcher backed by `thread_count` worker threads
    pub fn new(thread_count: NonZeroUsize) -> PipelineResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(thread_count.get())
            .thread_name(|i| format!("userscout-worker-{}", i))
            .build()?;
        Ok(Self {
            pool,
            metrics: PipelineMetrics::new(),
        })
    }

    /// Gets the counters shared by this dispatcher's units
    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    pub fn thread_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Processes every record concurrently and returns once all units are done.
    ///
    /// Consumes `handoff` so that the channel closes as soon as this returns.
    pub fn dispatch<F, W>(
        &self,
        records: Vec<Record>,
        filter: &F,
        writer: &ReportWriter<W>,
        handoff: SyncSender<Record>,
    ) -> DispatchSummary
    where
        F: RecordFilter + ?Sized,
        W: Write + Send,
    {
        info!(
            "Dispatching {} records on {} threads",
            records.len(),
            self.thread_count()
        );

        let dispatched = records.len();
        let completed = AtomicUsize::new(0);
        let matched = AtomicUsize::new(0);
        let metrics = &self.metrics;

        self.pool.scope(|scope| {
            for record in records {
                let handoff = handoff.clone();
                let completed = &completed;
                let matched = &matched;
                metrics.record_dispatch();
                scope.spawn(move |_| {
                    let _done = CompletionGuard { completed, metrics };
                    if process_unit(record, filter, writer, &handoff, metrics) {
                        matched.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }
        });

        // Every unit has joined; closing our sender lets the collector finish
        drop(handoff);

        let summary = DispatchSummary {
            dispatched,
            completed: completed.into_inner(),
            matched: matched.into_inner(),
        };
        debug!("Dispatch finished: {:?}", summary);
        metrics.log_stats();
        summary
    }
}

/// Marks a unit complete when it goes out of scope, even on unwind
struct CompletionGuard<'a> {
    completed: &'a AtomicUsize,
    metrics: &'a PipelineMetrics,
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        self.completed.fetch_add(1, Ordering::AcqRel);
        self.metrics.record_completion();
    }
}

/// Runs the render and filter steps for one record; returns whether it matched
fn process_unit<F, W>(
    record: Record,
    filter: &F,
    writer: &ReportWriter<W>,
    handoff: &SyncSender<Record>,
    metrics: &PipelineMetrics,
) -> bool
where
    F: RecordFilter + ?Sized,
    W: Write + Send,
{
    trace!("Processing record {}", record.id);

    let written = writer.display(&record);
    metrics.record_render(written);

    if !filter.matches(&record) {
        return false;
    }

    let id = record.id;
    // Blocks until the collector takes the record
    let delivered = match handoff.send(record) {
        Ok(()) => true,
        Err(_) => {
            warn!("Collector is gone, dropping matched record {}", id);
            false
        }
    };
    metrics.record_match(delivered);
    true
}
