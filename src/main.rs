use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use dashboard_fetch::config::{Config, FetchDefaults};
use dashboard_fetch::fetch::{AttemptStatus, FetchController};
use dashboard_fetch::logging::init_tracing;
use dashboard_fetch::source::JsonSource;

/// Fetch a dashboard endpoint through a fetch controller and print the result.
#[derive(Parser, Debug)]
#[command(name = "dashboard-fetch", version)]
struct Cli {
    /// Endpoint name from the config file, or a literal path such as /api/plan/pre/today
    endpoint: String,

    /// Config file (default: <config dir>/dashboard-fetch/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override api.base_url from the config
    #[arg(long)]
    base_url: Option<String>,

    /// Number of attempts to run back to back
    #[arg(long, default_value_t = 1)]
    repeat: u32,

    /// Do not fetch at construction; every attempt is an explicit execute
    #[arg(long)]
    no_immediate: bool,

    /// Pause between attempts in milliseconds
    #[arg(long, default_value_t = 0)]
    interval_ms: u64,
}

impl Cli {
    fn immediate(&self, defaults: &FetchDefaults) -> bool {
        defaults.immediate && !self.no_immediate
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
        config.validate()?;
    }

    let path = config.resolve_endpoint(&cli.endpoint)?;
    let source = JsonSource::new(&config.api).context("creating HTTP client")?;

    let immediate = cli.immediate(&config.fetch);
    let options = config
        .fetch
        .options::<serde_json::Value>()
        .immediate(immediate);
    // With `immediate` the constructor has already started attempt 1.
    let controller = FetchController::new(source.producer(path.clone()), options);

    for attempt in 1..=cli.repeat.max(1) {
        let status = if attempt == 1 && immediate {
            match controller.settled().await.error {
                Some(_) => AttemptStatus::Failed,
                None => AttemptStatus::Succeeded,
            }
        } else {
            if attempt > 1 && cli.interval_ms > 0 {
                tokio::time::sleep(Duration::from_millis(cli.interval_ms)).await;
            }
            controller.execute().await
        };
        info!(attempt, ?status, endpoint = %path, "attempt settled");
    }

    let state = controller.snapshot();
    if let Some(data) = &state.data {
        println!("{}", serde_json::to_string_pretty(data)?);
    }
    if let Some(err) = state.error {
        bail!("fetching {} failed: {}", source.url(&path), err);
    }
    Ok(())
}
