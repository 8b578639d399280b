use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors raised while fetching records from a source.
///
/// Fatal to a run: nothing is rendered and nothing is persisted.
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("Request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        source: reqwest::Error,
    },
    #[error("Unexpected HTTP status {status} from {endpoint}")]
    Status { endpoint: String, status: u16 },
    #[error("Failed to decode records: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors raised while writing the match set to its destination.
///
/// The concurrent phase has already completed when one of these is returned.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Top-level error for a pipeline run
///
/// ```rust,ignore
/// match run_pipeline(&config, &source, &persister, &writer) {
///     Ok(report) => println!("{}", report.status_line()),
///     Err(PipelineError::Retrieval(e)) => println!("Error fetching users: {}", e),
///     Err(PipelineError::Persistence(e)) => println!("Error persisting users: {}", e),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Failed to start collector thread: {0}")]
    CollectorSpawn(std::io::Error),
    #[error("Collector thread terminated before finalizing matches")]
    CollectorFailed,
}

impl RetrievalError {
    pub fn invalid_endpoint(msg: impl Into<String>) -> Self {
        Self::InvalidEndpoint(msg.into())
    }

    pub fn request(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Request {
            endpoint: endpoint.into(),
            source,
        }
    }

    pub fn status(endpoint: impl Into<String>, status: u16) -> Self {
        Self::Status {
            endpoint: endpoint.into(),
            status,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl PersistenceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl PipelineError {
    /// True when the run failed before any record was processed
    pub fn is_retrieval(&self) -> bool {
        matches!(self, Self::Retrieval(_))
    }

    /// True when the run failed after the concurrent phase completed
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}
