use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Counters shared by every dispatched task
#[derive(Debug, Clone)]
pub struct PipelineMetrics {
    // Unit lifecycle
    dispatched: Arc<AtomicU64>,
    completed: Arc<AtomicU64>,

    // Work done inside units
    rendered_bytes: Arc<AtomicU64>,
    matched: Arc<AtomicU64>,
    handoffs: Arc<AtomicU64>,
    failed_handoffs: Arc<AtomicU64>,
}

impl PipelineMetrics {
    /// Creates a new PipelineMetrics instance
    pub fn new() -> Self {
        Self {
            dispatched: Arc::new(AtomicU64::new(0)),
            completed: Arc::new(AtomicU64::new(0)),
            rendered_bytes: Arc::new(AtomicU64::new(0)),
            matched: Arc::new(AtomicU64::new(0)),
            handoffs: Arc::new(AtomicU64::new(0)),
            failed_handoffs: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records a unit being spawned
    pub fn record_dispatch(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a unit finishing both its render and filter steps
    pub fn record_completion(&self) {
        let done = self.completed.fetch_add(1, Ordering::AcqRel) + 1;
        debug!("Unit completed, {} done", done);
    }

    /// Records bytes written to the report stream
    pub fn record_render(&self, bytes: usize) {
        self.rendered_bytes
            .fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Records a filter match and whether its handoff reached the collector
    pub fn record_match(&self, delivered: bool) {
        self.matched.fetch_add(1, Ordering::Relaxed);
        if delivered {
            self.handoffs.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_handoffs.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Gets a snapshot of the counters
    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            dispatched: self.dispatched.load(Ordering::Acquire),
            completed: self.completed.load(Ordering::Acquire),
            rendered_bytes: self.rendered_bytes.load(Ordering::Relaxed),
            matched: self.matched.load(Ordering::Relaxed),
            handoffs: self.handoffs.load(Ordering::Relaxed),
            failed_handoffs: self.failed_handoffs.load(Ordering::Relaxed),
        }
    }

    /// Logs the current counters
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Pipeline stats:\n\
             Units dispatched/completed: {}/{}\n\
             Report bytes written: {}\n\
             Matches (delivered/failed): {} ({}/{})",
            stats.dispatched,
            stats.completed,
            stats.rendered_bytes,
            stats.matched,
            stats.handoffs,
            stats.failed_handoffs
        );
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of [`PipelineMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    pub dispatched: u64,
    pub completed: u64,
    pub rendered_bytes: u64,
    pub matched: u64,
    pub handoffs: u64,
    pub failed_handoffs: u64,
}
