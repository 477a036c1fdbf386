//! file-notify — file-integrity audit agent.
//!
//! Loads audit rules, snapshots every watched tree once, then re-checks each
//! tree on its own staggered timer and ships drift alerts to a remote
//! syslog-style collector over TCP. Runs until SIGINT/SIGTERM.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use filewatch_audit::{assemble_jobs, AuditScheduler, SchedulerSettings};
use filewatch_core::{load_dotenv, AgentConfig, Destination, RetryPolicy, TOOL_NAME};
use filewatch_notify::{Dispatcher, TcpNotifier};
use filewatch_rules::load_rules;

// ── CLI ─────────────────────────────────────────────────────────────

/// File-integrity audit agent: watches rule paths and reports drift over TCP.
#[derive(Parser, Debug)]
#[command(name = "file-notify", about, disable_version_flag = true)]
struct Cli {
    /// Destination hostname or IP address.
    #[arg(long, env = "FILE_NOTIFY_DST", default_value = "127.0.0.1")]
    dst: String,

    /// Destination port.
    #[arg(long, env = "FILE_NOTIFY_DPORT", default_value_t = 6000)]
    dport: u16,

    /// Enable debug logging.
    #[arg(long, env = "FILE_NOTIFY_DEBUG")]
    debug: bool,

    /// Log file.
    #[arg(long, env = "FILE_NOTIFY_LOG", default_value = "file-watch.log")]
    log: PathBuf,

    /// Poll interval in minutes.
    #[arg(long, env = "FILE_NOTIFY_POLL", default_value_t = 1)]
    poll: u64,

    /// Rules configuration file.
    #[arg(long, env = "FILE_NOTIFY_RULES", default_value = "file-watch.rules")]
    rules: PathBuf,

    /// Connection attempts per alert batch when the collector refuses.
    #[arg(long, env = "FILE_NOTIFY_RETRY_ATTEMPTS", default_value_t = 2)]
    retry_attempts: u32,

    /// Seconds between refused connection attempts.
    #[arg(long, env = "FILE_NOTIFY_RETRY_INTERVAL", default_value_t = 2)]
    retry_interval: u64,

    /// Seconds between the first passes of consecutive jobs.
    #[arg(long, env = "FILE_NOTIFY_STAGGER", default_value_t = 30)]
    stagger: u64,

    /// Display version and exit.
    #[arg(long)]
    version: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<AgentConfig> {
        let config = AgentConfig {
            destination: Destination::new(self.dst, self.dport),
            poll_interval: Duration::from_secs(self.poll.saturating_mul(60)),
            stagger: Duration::from_secs(self.stagger),
            retry: RetryPolicy {
                max_attempts: self.retry_attempts,
                backoff: Duration::from_secs(self.retry_interval),
            },
            debug: self.debug,
            rules_path: self.rules,
            log_path: self.log,
        };
        Ok(config.validate()?)
    }
}

fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match (option_env!("FILE_NOTIFY_COMMIT"), option_env!("FILE_NOTIFY_BRANCH")) {
        (Some(commit), Some(branch)) => {
            format!("{TOOL_NAME} v{version} (commit: {commit}, branch: {branch})")
        }
        (Some(commit), None) => format!("{TOOL_NAME} v{version} (commit: {commit})"),
        _ => format!("{TOOL_NAME} v{version}"),
    }
}

// ── Logging ─────────────────────────────────────────────────────────

fn open_log_file(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o640);
    }
    options.open(path)
}

/// Install the global subscriber: append to the log file, or stderr if it
/// cannot be opened. `RUST_LOG` overrides the level picked by `--debug`.
fn init_logging(config: &AgentConfig) {
    let default_level = if config.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    match open_log_file(&config.log_path) {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(false)
            .with_writer(Arc::new(file))
            .init(),
        Err(e) => {
            eprintln!(
                "failed to open log file {}: {e}; logging to stderr",
                config.log_path.display()
            );
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(io::stderr)
                .init();
        }
    }
}

// ── Shutdown ────────────────────────────────────────────────────────

/// Wait for SIGINT or SIGTERM (Unix) or Ctrl+C (cross-platform fallback).
async fn os_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigint = signal(SignalKind::interrupt()).context("failed to register SIGINT")?;
        let mut sigterm = signal(SignalKind::terminate()).context("failed to register SIGTERM")?;
        tokio::select! {
            _ = sigint.recv() => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .context("failed to listen for ctrl_c")?;
    }

    Ok(())
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    let cli = Cli::parse();

    if cli.version {
        println!("{}", version_string());
        return Ok(());
    }

    let config = cli.into_config().context("invalid configuration")?;
    init_logging(&config);

    info!("{} starting", version_string());
    info!("debug: {}", config.debug);
    config.log_summary();

    run(config).await.inspect_err(|e| error!("fatal error: {e:#}"))
}

async fn run(config: AgentConfig) -> anyhow::Result<()> {
    let plans = load_rules(&config.rules_path).context("fatal error loading audit rules")?;

    let assembly = assemble_jobs(plans);
    for skipped in &assembly.skipped {
        eprintln!(
            "skipping rule {} of {} ({}): {}. check rules and file system path",
            skipped.rule,
            config.rules_path.display(),
            skipped.path.display(),
            skipped.error
        );
    }
    if assembly.jobs.is_empty() {
        anyhow::bail!(
            "no audit jobs could be assembled from {}",
            config.rules_path.display()
        );
    }

    let notifier = TcpNotifier::new(config.destination.clone(), config.retry.clone(), TOOL_NAME);
    let dispatcher = Arc::new(Dispatcher::new(Box::new(notifier)));
    let scheduler = AuditScheduler::new(SchedulerSettings::from(&config), dispatcher);
    scheduler.spawn_all(assembly.jobs);

    let signal = os_signal().await;
    info!("shutdown signal received");
    scheduler.shutdown();
    scheduler.wait().await;
    info!("shutdown complete");

    signal
}
