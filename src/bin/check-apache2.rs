use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

use health_probes::checks::{ApacheCheck, HttpStatusSource};
use health_probes::config::{read_or_default, validate_config, ConfigError, ProbeConfig};
use health_probes::health::Severity;
use health_probes::observability::logging;
use health_probes::report::{render, render_error};
use health_probes::state::FileRateStore;
use health_probes::ProbeError;

#[derive(Parser)]
#[command(name = "check-apache2")]
#[command(about = "Icinga/Nagios plugin which checks Apache's server-status page", long_about = None)]
struct Cli {
    /// Optional TOML configuration file; flags override its values
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(short = 'H', long)]
    hostname: Option<String>,

    #[arg(short = 'P', long)]
    port: Option<u16>,

    /// Query the status page over https
    #[arg(short = 'S', long)]
    ssl: bool,

    #[arg(short = 's', long)]
    status_page: Option<String>,

    /// Warn when this percent of scoreboard slots is in use
    #[arg(short = 'w', long)]
    total_warning: Option<u32>,

    /// Go critical when this percent of scoreboard slots is in use
    #[arg(short = 'c', long)]
    total_critical: Option<u32>,

    /// Warn when fewer idle workers remain
    #[arg(long)]
    min_idle: Option<u64>,

    /// Where the previous run's counter is kept
    #[arg(long, value_name = "PATH")]
    state_file: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,
}

impl Cli {
    fn resolve_config(&self) -> Result<ProbeConfig, ConfigError> {
        let mut config = read_or_default(self.config.as_deref())?;
        let apache = &mut config.apache;

        if let Some(hostname) = &self.hostname {
            apache.hostname = hostname.clone();
        }
        if let Some(port) = self.port {
            apache.port = port;
        }
        if self.ssl {
            apache.ssl = true;
        }
        if let Some(page) = &self.status_page {
            apache.status_page = page.clone();
        }
        if let Some(warn) = self.total_warning {
            apache.worker_warn_percent = warn;
        }
        if let Some(crit) = self.total_critical {
            apache.worker_crit_percent = crit;
        }
        if let Some(min_idle) = self.min_idle {
            apache.min_idle_workers = min_idle;
        }
        if let Some(path) = &self.state_file {
            apache.state_file = path.clone();
        }
        if let Some(secs) = self.timeout {
            apache.timeout_secs = secs;
        }
        Ok(config)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

async fn run(cli: Cli) -> Result<(String, Severity), ProbeError> {
    let config = cli.resolve_config()?;
    logging::init(&config.logging);

    let check = ApacheCheck::from_config(&config.apache)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    let source = HttpStatusSource::from_config(&config.apache)?;
    let store = FileRateStore::new(config.apache.state_file.clone());
    tracing::info!(url = %source.url(), state_file = %store.path().display(), "Starting apache check");

    let result = check.run(&source, &store, unix_now()).await?;
    Ok((render(&result, true), result.severity))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let detail = e.to_string();
            let first = detail.lines().next().unwrap_or("invalid arguments");
            println!("{} - {}", Severity::Unknown, first.trim_start_matches("error: "));
            return ExitCode::from(Severity::Unknown.exit_code());
        }
    };

    let (line, severity) = match run(cli).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(error = %e, "apache check aborted");
            (render_error(&e), e.severity())
        }
    };

    println!("{}", line);
    ExitCode::from(severity.exit_code())
}
