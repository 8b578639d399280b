use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::filter::DEFAULT_FILTER_PATTERN;
use crate::persist::OutputFormat;
use crate::source::DEFAULT_SOURCE_URL;

/// Configuration for a pipeline run.
///
/// # Configuration Locations
///
/// Values are layered from, in order of increasing precedence:
/// 1. Global `$CONFIG_DIR/userscout/config.yaml`
/// 2. Local `.userscout.yaml` in the current directory
/// 3. A file passed with `--config` (must exist)
///
/// Command-line flags are applied last through [`PipelineConfig::merge_with_cli`].
///
/// # Configuration Format
///
/// ```yaml
/// # Endpoint returning a JSON array of users
/// source_url: "https://jsonplaceholder.typicode.com/users"
///
/// # Where matching users are written, and how
/// output_path: "filtered_users.yaml"
/// output_format: "yaml"   # yaml | json
///
/// # Case-insensitive substring looked for in each company tagline
/// filter_pattern: "task-force"
///
/// # Worker threads (default: CPU cores)
/// thread_count: 4
///
/// # HTTP timeout in seconds
/// request_timeout_secs: 30
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "warn"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Endpoint the records are fetched from
    pub source_url: String,

    /// Destination file for the matched records
    pub output_path: PathBuf,

    /// Serialization of the destination file
    pub output_format: OutputFormat,

    /// Substring the tagline must contain, compared case-insensitively
    pub filter_pattern: String,

    /// Number of worker threads for the dispatcher
    pub thread_count: NonZeroUsize,

    /// Request timeout for the HTTP source, in seconds
    pub request_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("filtered_users.yaml")
}

const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            output_path: default_output_path(),
            output_format: OutputFormat::Yaml,
            filter_pattern: DEFAULT_FILTER_PATTERN.to_string(),
            thread_count: default_thread_count(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: default_log_level(),
        }
    }
}

impl PipelineConfig {
    /// Loads configuration, layering an explicit file over the default locations
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let default_files = [
            dirs::config_dir().map(|p| p.join("userscout/config.yaml")),
            Some(PathBuf::from(".userscout.yaml")),
        ];
        for path in default_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // An explicit file is required to exist
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(url) = cli.source_url {
            self.source_url = url;
        }
        if let Some(path) = cli.output_path {
            // Pick the format from the extension unless one was given explicitly
            if cli.output_format.is_none() {
                if let Some(format) = OutputFormat::from_path(&path) {
                    self.output_format = format;
                }
            }
            self.output_path = path;
        }
        if let Some(format) = cli.output_format {
            self.output_format = format;
        }
        if let Some(pattern) = cli.filter_pattern {
            self.filter_pattern = pattern;
        }
        if let Some(threads) = cli.thread_count {
            self.thread_count = threads;
        }
        if let Some(timeout) = cli.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Renders the configuration in the same format it is loaded from
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Values given on the command line; `None` leaves the file value in place
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub source_url: Option<String>,
    pub output_path: Option<PathBuf>,
    pub output_format: Option<OutputFormat>,
    pub filter_pattern: Option<String>,
    pub thread_count: Option<NonZeroUsize>,
    pub request_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}
