//! check-haproxy: Icinga/Nagios plugin for HAProxy load balancers.
//!
//! # Pipeline
//!
//! ```text
//!   ┌──────────────┐   show stat   ┌──────────────┐   CSV    ┌──────────────┐
//!   │ stats socket │◀──────────────│  transport   │─────────▶│    parser    │
//!   │  (HAProxy)   │──────────────▶│    (net)     │          │   (stats)    │
//!   └──────────────┘               └──────────────┘          └──────┬───────┘
//!                                                                   │ StatsSnapshot
//!                                                                   ▼
//!   ┌──────────────┐  Severity   ┌──────────────┐  Verdicts  ┌──────────────┐
//!   │   renderer   │◀────────────│  aggregator  │◀───────────│  evaluator   │◀── Inventory
//!   │   (report)   │             │   (health)   │            │   (health)   │
//!   └──────┬───────┘             └──────────────┘            └──────────────┘
//!          │
//!          ▼
//!   stdout: "<SEVERITY> - <summary>, <findings> | <perfdata>"
//!   exit:   0 OK, 1 WARNING, 2 CRITICAL, 3 UNKNOWN
//! ```
//!
//! Thresholds and flag combinations are validated before the socket is
//! touched. Every failure prints one `UNKNOWN - ...` line and exits 3.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use health_probes::checks::{HaproxyCheck, Mode};
use health_probes::config::{read_or_default, validate_config, ConfigError, ProbeConfig};
use health_probes::health::{Severity, Thresholds};
use health_probes::net::StatsSocket;
use health_probes::observability::logging;
use health_probes::report::{render, render_error};
use health_probes::stats::EntityKind;
use health_probes::ProbeError;

#[derive(Parser)]
#[command(name = "check-haproxy")]
#[command(about = "Icinga/Nagios plugin which checks a haproxy load balancer", long_about = None)]
struct Cli {
    /// Optional TOML configuration file; flags override its values
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Location of haproxy stats socket file
    #[arg(long, value_name = "PATH")]
    socketfile: Option<PathBuf>,

    /// Plugin mode
    #[arg(long, value_enum, default_value_t = ModeArg::Instance)]
    mode: ModeArg,

    /// Name of the entity to check (only with a frontend, backend or server mode)
    #[arg(long, alias = "frontend", value_name = "NAME")]
    name: Option<String>,

    /// Enable perfdata
    #[arg(long, overrides_with = "no_perfdata")]
    perfdata: bool,

    /// Disable perfdata
    #[arg(long, overrides_with = "perfdata")]
    no_perfdata: bool,

    /// Exit WARN if sessions reach <SLIMWARN>% of session limit
    #[arg(long = "slimwarn", value_name = "SLIMWARN")]
    slim_warn: Option<u32>,

    /// Exit CRIT if sessions reach <SLIMCRIT>% of session limit
    #[arg(long = "slimcrit", value_name = "SLIMCRIT")]
    slim_crit: Option<u32>,

    /// Socket timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Instance,
    Frontend,
    Backend,
    Server,
}

impl ModeArg {
    fn kind(self) -> Option<EntityKind> {
        match self {
            ModeArg::Instance => None,
            ModeArg::Frontend => Some(EntityKind::Frontend),
            ModeArg::Backend => Some(EntityKind::Backend),
            ModeArg::Server => Some(EntityKind::Server),
        }
    }
}

impl Cli {
    /// File (or defaults) with command-line overrides applied.
    fn resolve_config(&self) -> Result<ProbeConfig, ConfigError> {
        let mut config = read_or_default(self.config.as_deref())?;

        if let Some(path) = &self.socketfile {
            config.haproxy.socket_path = path.clone();
        }
        if let Some(secs) = self.timeout {
            config.haproxy.timeout_secs = secs;
        }
        if let Some(warn) = self.slim_warn {
            config.thresholds.session_warn_percent = warn;
        }
        if let Some(crit) = self.slim_crit {
            config.thresholds.session_crit_percent = crit;
        }
        if self.perfdata {
            config.output.perfdata = true;
        }
        if self.no_perfdata {
            config.output.perfdata = false;
        }
        Ok(config)
    }
}

async fn run(cli: Cli) -> Result<(String, Severity), ProbeError> {
    let config = cli.resolve_config()?;
    logging::init(&config.logging);

    let thresholds = Thresholds::new(
        config.thresholds.session_warn_percent,
        config.thresholds.session_crit_percent,
    )?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    let mode = Mode::select(cli.mode.kind(), cli.name)?;

    let socket = StatsSocket::from_config(&config.haproxy);
    tracing::info!(
        socket = %socket.path().display(),
        ?mode,
        warn_percent = thresholds.warn_percent(),
        crit_percent = thresholds.crit_percent(),
        "Starting haproxy check"
    );

    let check = HaproxyCheck::new(config.haproxy.command.clone(), thresholds, mode);
    let result = check.run(&socket).await?;

    Ok((render(&result, config.output.perfdata), result.severity))
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
            tracing::warn!(error = %e, "haproxy check aborted");
            (render_error(&e), e.severity())
        }
    };

    println!("{}", line);
    ExitCode::from(severity.exit_code())
}
