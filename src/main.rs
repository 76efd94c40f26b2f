//! CLI entry point for the transfers explorer.
//!
//! Downloads one month of federal transfers from the transparency portal and
//! opens an interactive session to compare spending categories across UFs.

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use transparencia_explorer::{
    catalog::DEFAULT_PAGE_SIZE,
    compare::DEFAULT_DISPLAY_LIMIT,
    config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, ExplorerConfig, LogFileTarget},
    fetch::BasicClient,
    output::{OutputFormat, write_skipped},
    period::PeriodKey,
    prompt::Console,
    session::{ask_period, explore, load_period},
};

#[derive(Parser)]
#[command(name = "transparencia_explorer")]
#[command(about = "Explore monthly federal transfers by UF and action", long_about = None)]
struct Cli {
    /// Year and month to download (AAAAMM); asked interactively when omitted
    #[arg(short, long, value_name = "AAAAMM")]
    period: Option<String>,

    /// Base URL the period is appended to
    #[arg(long, env = "TRANSPARENCIA_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Number of action names listed per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Maximum number of filtered rows printed
    #[arg(long, default_value_t = DEFAULT_DISPLAY_LIMIT)]
    display_limit: usize,

    /// Download timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// How results are printed
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl Cli {
    fn config(&self) -> Result<ExplorerConfig> {
        ExplorerConfig {
            base_url: self.base_url.clone(),
            page_size: self.page_size,
            display_limit: self.display_limit,
            timeout: Duration::from_secs(self.timeout_secs),
            format: self.format,
        }
        .validate()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr, plus a JSON rolling log file when LOG_FILE_PATH is set
    // Interactive prompts share the terminal, so stderr stays quiet by default
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse()?));

    let log_target = LogFileTarget::from_env_value(std::env::var("LOG_FILE_PATH").ok().as_deref());
    let (json_layer, _file_guard) = match log_target {
        Some(target) => {
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(target.prefix)
                .build(&target.dir)?;
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(non_blocking_file)
                .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            debug!(error = %format!("{e:#}"), "Run aborted");
            eprintln!("An error occurred: {e:#}");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config = cli.config()?;
    let mut console = Console::stdio();

    let period = match &cli.period {
        Some(raw) => PeriodKey::parse(raw)?,
        None => ask_period(&mut console)?,
    };
    info!(%period, base_url = %config.base_url, "Starting session");

    let client = BasicClient::new(config.timeout)?;
    let projection = load_period(&client, &config, period).await?;

    write_skipped(console.out(), &projection.skipped)?;
    explore(&mut console, &projection.dataset, &config)?;

    info!("Session finished");
    Ok(())
}
