use std::io::{self, Write};
use std::sync::Mutex;
use tracing::warn;

use crate::record::Record;

/// Formats one record as a report block, including the trailing blank line
pub fn render_record(record: &Record) -> String {
    format!(
        "Name: {}\nEmail: {}\nAddress: {}, {}, {}, {}\nCompany: {}, {}\n\n",
        record.name,
        record.email,
        record.address.street,
        record.address.suite,
        record.address.city,
        record.address.zipcode,
        record.company.name,
        record.company.catch_phrase,
    )
}

/// Shared, append-only sink for report blocks.
///
/// Each block is written under the lock in a single call, so concurrent
/// writers never interleave within a block.
#[derive(Debug)]
pub struct ReportWriter<W> {
    inner: Mutex<W>,
}

impl ReportWriter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ReportWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Writes a complete block, returning the number of bytes written.
    /// Failures are logged; rendering has no error path.
    pub fn write_block(&self, block: &str) -> usize {
        // A poisoned lock only means another writer panicked mid-block
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let written = guard.write_all(block.as_bytes());
        match written.and_then(|_| guard.flush()) {
            Ok(()) => block.len(),
            Err(e) => {
                warn!("Failed to write report block: {}", e);
                0
            }
        }
    }

    /// Renders and writes one record
    pub fn display(&self, record: &Record) -> usize {
        self.write_block(&render_record(record))
    }

    pub fn into_inner(self) -> W {
        match self.inner.into_inner() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
