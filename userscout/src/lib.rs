pub mod collect;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod filter;
pub mod metrics;
pub mod persist;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod source;

pub use config::{CliOverrides, PipelineConfig};
pub use errors::{PersistenceError, PipelineError, PipelineResult, RetrievalError};
pub use filter::{RecordFilter, TaglineFilter};
pub use persist::{FilePersister, OutputFormat, Persister};
pub use pipeline::{run_pipeline, PersistOutcome, PipelineReport};
pub use record::{Address, Company, MatchSet, Record};
pub use render::{render_record, ReportWriter};
pub use source::{FileRecordSource, HttpRecordSource, RecordSource};
