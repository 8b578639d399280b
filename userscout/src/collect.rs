use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};
use tracing::{debug, trace};

use crate::errors::{PipelineError, PipelineResult};
use crate::record::{MatchSet, Record};

/// Fan-in side of the pipeline.
///
/// A dedicated thread owns the accumulating records outright; dispatched units
/// only ever touch the sending half of a rendezvous channel. The thread stops
/// when the channel closes, which happens once every sender has been dropped.
#[derive(Debug)]
pub struct Collector {
    handle: JoinHandle<Vec<Record>>,
}

impl Collector {
    /// Starts the collector thread and returns the handoff sender that feeds it.
    ///
    /// The channel has no buffer: a send blocks until the collector has taken
    /// the record.
    pub fn spawn() -> PipelineResult<(SyncSender<Record>, Self)> {
        let (sender, receiver) = mpsc::sync_channel(0);
        let handle = thread::Builder::new()
            .name("userscout-collector".to_string())
            .spawn(move || drain(receiver))
            .map_err(PipelineError::CollectorSpawn)?;
        Ok((sender, Self { handle }))
    }

    /// Waits for the channel to close and returns the finished match set.
    ///
    /// Every sender must already be dropped or scheduled to drop, otherwise this
    /// blocks forever.
    pub fn finish(self) -> PipelineResult<MatchSet> {
        let records = self
            .handle
            .join()
            .map_err(|_| PipelineError::CollectorFailed)?;
        debug!("Collector finalized {} matches", records.len());
        Ok(MatchSet::from_records(records))
    }
}

fn drain(receiver: Receiver<Record>) -> Vec<Record> {
    let mut records = Vec::new();
    for record in receiver {
        trace!("Collected record {}", record.id);
        records.push(record);
    }
    records
}
