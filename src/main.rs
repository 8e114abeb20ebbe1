use anyhow::{Context, Result};
use clap::Parser;
use nbclosest::{run_pipeline, FilterConfig, TimeZoneSetting};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nbclosest")]
#[command(about = "Keep each vehicle's closest sample to the stop it is approaching")]
struct Args {
    /// JSON config file; flags below override it
    #[arg(short, long, env = "NBCLOSEST_CONFIG")]
    config: Option<PathBuf>,

    /// CSV input (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// CSV output (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Name of the timestamp column, e.g. `_time` for Splunk exports
    #[arg(long, env = "NBCLOSEST_TIME_FIELD")]
    time_field: Option<String>,

    #[arg(long)]
    vehicle_field: Option<String>,

    #[arg(long)]
    distance_field: Option<String>,

    #[arg(long)]
    stop_field: Option<String>,

    /// Zone that decides where one day ends: `local` or an IANA name
    #[arg(long, env = "NBCLOSEST_TIME_ZONE")]
    time_zone: Option<TimeZoneSetting>,

    #[arg(long)]
    delimiter: Option<char>,
}

impl Args {
    fn filter_config(&self) -> Result<FilterConfig> {
        let mut config = match &self.config {
            Some(path) => FilterConfig::load(path)?,
            None => FilterConfig::default(),
        };
        if let Some(name) = &self.time_field {
            config.fields.time = name.clone();
        }
        if let Some(name) = &self.vehicle_field {
            config.fields.vehicle_id = name.clone();
        }
        if let Some(name) = &self.distance_field {
            config.fields.vehicle_distance = name.clone();
        }
        if let Some(name) = &self.stop_field {
            config.fields.stop_tag = name.clone();
        }
        if let Some(zone) = self.time_zone {
            config.time_zone = zone;
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        Ok(config)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nbclosest=info")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(Args::parse()) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = args.filter_config()?;

    let input: Box<dyn Read + Send> = match &args.input {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        ),
        None => Box::new(io::stdin()),
    };
    let output: Box<dyn Write + Send> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let outcome = runtime.block_on(run_pipeline(input, output, config, async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    }));
    // An interrupted reader may still be parked on stdin.
    runtime.shutdown_background();

    outcome?;
    Ok(())
}
