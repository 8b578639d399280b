use crate::record::Record;

/// Needle used when no filter pattern is configured
pub const DEFAULT_FILTER_PATTERN: &str = "task-force";

/// A predicate deciding whether a record belongs in the match set.
///
/// Filters are shared by every dispatched unit, so implementations must not
/// keep mutable state between calls.
pub trait RecordFilter: Send + Sync {
    fn matches(&self, record: &Record) -> bool;
}

/// Case-insensitive substring test against the company tagline
#[derive(Debug, Clone)]
pub struct TaglineFilter {
    needle: String,
}

impl TaglineFilter {
    pub fn new(pattern: impl AsRef<str>) -> Self {
        Self {
            needle: pattern.as_ref().to_lowercase(),
        }
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }
}

impl Default for TaglineFilter {
    fn default() -> Self {
        Self::new(DEFAULT_FILTER_PATTERN)
    }
}

impl RecordFilter for TaglineFilter {
    fn matches(&self, record: &Record) -> bool {
        record.tagline().to_lowercase().contains(&self.needle)
    }
}
