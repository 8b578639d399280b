use reqwest::blocking::Client;
use reqwest::Url;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::errors::RetrievalError;
use crate::record::Record;

/// Endpoint used when none is configured
pub const DEFAULT_SOURCE_URL: &str = "https://jsonplaceholder.typicode.com/users";

const USER_AGENT: &str = concat!("userscout/", env!("CARGO_PKG_VERSION"));

/// Supplies the full set of records for one run.
///
/// Sources are passed into the pipeline explicitly, so a run can read from a
/// local server or an in-memory list as easily as from the real endpoint.
pub trait RecordSource {
    fn fetch_records(&self) -> Result<Vec<Record>, RetrievalError>;

    /// Human-readable origin, used in log output
    fn describe(&self) -> String;
}

/// Fetches a JSON array of records with a single GET request
#[derive(Debug, Clone)]
pub struct HttpRecordSource {
    client: Client,
    endpoint: Url,
}

impl HttpRecordSource {
    /// Builds a source with the given request timeout
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, RetrievalError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| RetrievalError::invalid_endpoint(format!("{}: {}", endpoint, e)))?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RetrievalError::request(endpoint.as_str(), e))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl RecordSource for HttpRecordSource {
    fn fetch_records(&self) -> Result<Vec<Record>, RetrievalError> {
        info!("Fetching records from {}", self.endpoint);

        let response = self
            .client
            .get(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|e| RetrievalError::request(self.endpoint.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::status(
                self.endpoint.as_str(),
                status.as_u16(),
            ));
        }

        let body = response
            .bytes()
            .map_err(|e| RetrievalError::request(self.endpoint.as_str(), e))?;
        let records: Vec<Record> = serde_json::from_slice(&body)?;
        debug!("Decoded {} records ({} bytes)", records.len(), body.len());
        Ok(records)
    }

    fn describe(&self) -> String {
        self.endpoint.to_string()
    }
}

/// Reads a JSON array of records from a local file
#[derive(Debug, Clone)]
pub struct FileRecordSource {
    path: PathBuf,
}

impl FileRecordSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl RecordSource for FileRecordSource {
    fn fetch_records(&self) -> Result<Vec<Record>, RetrievalError> {
        info!("Reading records from {}", self.path.display());
        let bytes = fs::read(&self.path).map_err(|e| RetrievalError::io(&self.path, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

impl RecordSource for Vec<Record> {
    fn fetch_records(&self) -> Result<Vec<Record>, RetrievalError> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("{} in-memory records", self.len())
    }
}
