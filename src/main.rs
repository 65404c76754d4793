use clap::Parser;
use tracing_subscriber::EnvFilter;

use omni_kicker_runtime::config::{DEFAULT_KEY_PREFIX, MonitorConfig};
use omni_kicker_runtime::runtime::{self, RuntimeOptions};

/// Voice-driven omni base runtime
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Zenoh key prefix for directives, events and state
    #[arg(long, default_value = DEFAULT_KEY_PREFIX)]
    prefix: String,

    /// Consecutive qualifying samples a monitor must exceed before firing
    #[arg(long)]
    debounce_limit: Option<u32>,
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init(); // installs the subscriber globally

    let args = Args::parse();
    let mut monitor = MonitorConfig::default();
    if let Some(limit) = args.debounce_limit {
        monitor.debounce_limit = limit;
    }

    let options = RuntimeOptions {
        key_prefix: args.prefix,
        monitor,
    };

    if let Err(e) = runtime::run(options).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
