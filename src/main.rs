use std::path::{Path, PathBuf};
use std::time::Duration;

use catalog_tools::config::{
    CatalogConfig, DEFAULT_FACET, DEFAULT_FILTER_BASE, DEFAULT_OUTPUT, DEFAULT_ROOT_URL,
    FilterEndpoint,
};
use catalog_tools::io::http::{BlockingHttpCatalogClient, HttpCatalogClient};
use catalog_tools::pipeline;
use catalog_tools::{Result, ToolError};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging(&cli.log_level).and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|error| ToolError::Logging(error.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    let mode = cli.mode;
    let config = cli.into_config()?;

    let taxonomy = match mode {
        Mode::Sequential => {
            let client = BlockingHttpCatalogClient::new(config.timeout)?;
            pipeline::run_sequential(&client, &config)?
        }
        Mode::Concurrent => {
            let client = HttpCatalogClient::new(config.timeout)?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(pipeline::run_concurrent(&client, &config))?
        }
    };

    pipeline::write_export(&taxonomy, &config.output)
}

fn ensure_output_dir(output: &Path) -> Result<()> {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            Err(ToolError::InvalidOutput(output.to_path_buf()))
        }
        _ => Ok(()),
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Export the catalog category tree as a workbook with one sheet per root category."
)]
struct Cli {
    /// Traversal and networking model to use.
    #[arg(long, value_enum, default_value_t = Mode::Concurrent)]
    mode: Mode,

    /// Output workbook path. Overwritten if it exists.
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// URL of the menu document listing the root categories.
    #[arg(long, default_value = DEFAULT_ROOT_URL)]
    root_url: String,

    /// Base URL of the filter listing service.
    #[arg(long, default_value = DEFAULT_FILTER_BASE)]
    filter_base: String,

    /// Name of the filter group whose items become extra rows.
    #[arg(long, default_value = DEFAULT_FACET)]
    facet: String,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn into_config(self) -> Result<CatalogConfig> {
        ensure_output_dir(&self.output)?;
        Ok(CatalogConfig {
            root_url: self.root_url,
            filters: FilterEndpoint {
                base_url: self.filter_base,
                ..FilterEndpoint::default()
            },
            facet: self.facet,
            timeout: Duration::from_secs(self.timeout_secs),
            output: self.output,
        })
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Mode {
    /// Blocking client, pre-order walk, filter lookups skipped.
    Sequential,
    /// Async client, stack walk, filter lookups joined per root.
    Concurrent,
}
