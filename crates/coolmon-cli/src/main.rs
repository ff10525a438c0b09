//! coolmon: cooling controller monitor
//!
//! Connects to the controller, polls its status into a timestamped log,
//! forwards operator commands, and renders live metrics by tailing the log.

mod panel;
mod session;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use coolmon_core::config::MonitorConfig;
use coolmon_core::controller::{ControllerLink, DEFAULT_LOCAL_IP};
use coolmon_core::demo::DemoCooler;
use coolmon_core::logbook::{default_log_path, LogWriter};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Command line arguments. Flags override values from `--config`.
#[derive(Parser, Debug)]
#[command(name = "coolmon", version, about = "Cooling controller monitor")]
struct Args {
    /// IP address of the cooler (default 192.168.3.1)
    #[arg(long)]
    cooler_ip: Option<String>,

    /// Port number of the cooler (default 9760)
    #[arg(long)]
    cooler_port: Option<u16>,

    /// IP address of this computer to bind to (lab default 192.168.3.118)
    #[arg(long)]
    local_ip: Option<String>,

    /// Port number of this computer (default 9760)
    #[arg(long)]
    local_port: Option<u16>,

    /// Log file path to save to (default log/log_cooling_<time>.log)
    #[arg(long)]
    log: Option<PathBuf>,

    /// Bytes to tail from the end of the log; 0 or less reads it all
    #[arg(long, allow_hyphen_values = true)]
    block_size: Option<i64>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run against a simulated controller on localhost
    #[arg(long)]
    demo: bool,
}

impl Args {
    fn monitor_config(&self) -> Result<MonitorConfig> {
        let mut config = match &self.config {
            Some(path) => MonitorConfig::load(path)?,
            None => MonitorConfig::default(),
        };

        let controller = &mut config.controller;
        if let Some(ip) = &self.cooler_ip {
            controller.cooler_ip = ip.clone();
        }
        if let Some(port) = self.cooler_port {
            controller.cooler_port = port;
        }
        if let Some(ip) = &self.local_ip {
            controller.local_ip = Some(ip.clone());
        }
        if let Some(port) = self.local_port {
            controller.local_port = port;
        }
        if let Some(path) = &self.log {
            config.log_path = Some(path.clone());
        }
        if let Some(size) = self.block_size {
            config.block_size = size;
        }
        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Start the simulated controller and point the config at it
async fn start_demo(config: &mut MonitorConfig) -> Result<()> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("Failed to start demo controller")?;
    let addr = listener.local_addr()?;
    tracing::info!("Demo controller listening on {}", addr);

    tokio::spawn(async move {
        if let Err(e) = DemoCooler::new().serve(listener).await {
            tracing::error!("Demo controller stopped: {}", e);
        }
    });

    config.controller.cooler_ip = addr.ip().to_string();
    config.controller.cooler_port = addr.port();
    config.controller.local_ip = None;
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let mut config = args.monitor_config()?;
    if args.demo {
        start_demo(&mut config).await?;
    }

    let controller = &config.controller;
    tracing::info!(
        "connecting to {}:{} from {}",
        controller.cooler_ip,
        controller.cooler_port,
        controller.local_ip.as_deref().unwrap_or("any local address"),
    );
    let link = ControllerLink::connect(controller).await.with_context(|| {
        format!(
            "Connection to {}:{} failed! Check IP addresses and connection (lab machine is usually {})",
            controller.cooler_ip, controller.cooler_port, DEFAULT_LOCAL_IP
        )
    })?;

    let started = Local::now().naive_local();
    let log_path = config
        .log_path
        .clone()
        .unwrap_or_else(|| default_log_path(started));
    let banner = format!(
        "coolmon {} log started {} for controller {}",
        coolmon_core::VERSION,
        started.format(coolmon_core::logbook::TIMESTAMP_FORMAT),
        link.peer()
    );
    let writer = LogWriter::create(&log_path, &banner)
        .with_context(|| format!("Cannot open log file: {}", log_path.display()))?;
    tracing::info!("logging to {}", log_path.display());

    session::run(link, writer, &config).await
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let result = runtime.block_on(run(args));

    // Stdin reads park a blocking thread; don't wait for the operator.
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}
