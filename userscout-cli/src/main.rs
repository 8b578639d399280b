use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::{num::NonZeroUsize, path::PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use userscout::{
    run_pipeline, CliOverrides, FilePersister, FileRecordSource, HttpRecordSource, OutputFormat,
    PipelineConfig, PipelineError, RecordSource, ReportWriter,
};

type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
struct CliRunConfig {
    /// Endpoint returning a JSON array of users
    #[arg(short = 'u', long = "url")]
    url: Option<String>,

    /// Read users from a local JSON file instead of the endpoint
    #[arg(long, conflicts_with = "url")]
    input: Option<PathBuf>,

    /// File the matching users are written to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (yaml|json); defaults to the output file extension
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Substring to look for in company taglines (case-insensitive)
    #[arg(short, long)]
    filter: Option<String>,

    /// Number of threads to use
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Configuration file layered over the default locations
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl CliRunConfig {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            source_url: self.url.clone(),
            output_path: self.output.clone(),
            output_format: self.format,
            filter_pattern: self.filter.clone(),
            thread_count: self.threads,
            request_timeout_secs: self.timeout,
            log_level: self.log_level.clone(),
        }
    }

    fn load_config(&self) -> Result<PipelineConfig> {
        let file_config = PipelineConfig::load_from(self.config.as_deref())
            .context("Failed to load configuration")?;
        Ok(file_config.merge_with_cli(self.overrides()))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch users, print them, and persist those whose tagline matches
    Run(Box<CliRunConfig>),

    /// Print the effective configuration as YAML
    ShowConfig(Box<CliRunConfig>),
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let config = args.load_config()?;
            init_logging(&config.log_level);
            debug!("Effective configuration: {:?}", config);

            let source: Box<dyn RecordSource> = match &args.input {
                Some(path) => Box::new(FileRecordSource::new(path)),
                None => match HttpRecordSource::new(&config.source_url, config.request_timeout()) {
                    Ok(source) => Box::new(source),
                    Err(e) => {
                        report_failure(&PipelineError::from(e));
                        return Ok(());
                    }
                },
            };
            let persister = FilePersister::new(&config.output_path, config.output_format);
            let writer = ReportWriter::stdout();

            match run_pipeline(&config, &*source, &persister, &writer) {
                Ok(report) => println!("\n{}", report.status_line().green()),
                Err(e) => report_failure(&e),
            }
            Ok(())
        }
        Commands::ShowConfig(args) => {
            let config = args.load_config()?;
            print!("{}", config.to_yaml()?);
            Ok(())
        }
    }
}

/// Failures are reported to the user; the process still exits normally
fn report_failure(err: &PipelineError) {
    let step = if err.is_retrieval() {
        "fetching users"
    } else if err.is_persistence() {
        "persisting users"
    } else {
        "processing users"
    };
    println!("{}", format!("Error {}: {}", step, err).red());
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    // Logs go to stderr so stdout only carries the report
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
