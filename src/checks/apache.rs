//! Apache `server-status` check with a request rate.
//!
//! # Responsibilities
//! - Fetch the machine-readable status page (`?auto`)
//! - Compute requests/second against the previous run's record
//! - Evaluate idle workers and scoreboard usage
//!
//! # Design Decisions
//! - The rate record is read once at start and written once at end, through
//!   an injected `RateStore`
//! - A missing or corrupt previous record is UNKNOWN, but the new record is
//!   still written so the next run can compute a rate
//! - Worker usage reuses the session-usage evaluator

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use url::Url;

use crate::config::schema::ApacheConfig;
use crate::error::ProbeError;
use crate::health::{evaluate_usage, Severity, Thresholds, Verdict};
use crate::report::{CheckResult, PerfDatum, PerfValue};
use crate::state::{Loaded, RateRecord, RateStore};

/// Response of a status page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPage {
    pub status: u16,
    pub body: String,
}

/// Anything that can fetch the status page.
pub trait StatusSource {
    fn fetch_status(&self) -> impl Future<Output = Result<StatusPage, ProbeError>>;
}

/// Fetches the status page over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    url: Url,
    client: reqwest::Client,
}

impl HttpStatusSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| ProbeError::StatusRequest {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { url, client })
    }

    pub fn from_config(config: &ApacheConfig) -> Result<Self, ProbeError> {
        Self::new(status_url(config)?, Duration::from_secs(config.timeout_secs))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl StatusSource for HttpStatusSource {
    async fn fetch_status(&self) -> Result<StatusPage, ProbeError> {
        tracing::debug!(url = %self.url, "Fetching status page");
        let fail = |e: reqwest::Error| {
            tracing::warn!(url = %self.url, error = %e, "Status page request failed");
            ProbeError::StatusRequest {
                url: self.url.to_string(),
                reason: e.to_string(),
            }
        };

        let response = self.client.get(self.url.clone()).send().await.map_err(fail)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(fail)?;
        Ok(StatusPage { status, body })
    }
}

/// `<scheme>://<host>:<port>/<status_page>?auto`
pub fn status_url(config: &ApacheConfig) -> Result<Url, ProbeError> {
    let scheme = if config.ssl { "https" } else { "http" };
    let raw = format!("{}://{}:{}/", scheme, config.hostname, config.port);
    let invalid = |e: url::ParseError| ProbeError::Usage(format!("Invalid status URL {}: {}", raw, e));

    let mut url = Url::parse(&raw)
        .map_err(invalid)?
        .join(config.status_page.trim_start_matches('/'))
        .map_err(invalid)?;
    url.set_query(Some("auto"));
    Ok(url)
}

/// Parsed `Key: value` lines of the status page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerStatus {
    values: HashMap<String, String>,
}

impl ServerStatus {
    pub fn parse(body: &str) -> Self {
        let values = body
            .lines()
            .filter_map(|line| line.split_once(':'))
            .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
            .collect();
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn require(&self, key: &str) -> Result<&str, ProbeError> {
        self.get(key)
            .ok_or_else(|| ProbeError::MissingColumn(key.to_string()))
    }

    fn count(&self, key: &str) -> Result<u64, ProbeError> {
        let raw = self.require(key)?;
        raw.parse().map_err(|_| {
            ProbeError::MalformedStats(format!("'{}' is not numeric: '{}'", key, raw))
        })
    }

    pub fn total_accesses(&self) -> Result<u64, ProbeError> {
        self.count("Total Accesses")
    }

    pub fn busy_workers(&self) -> Result<u64, ProbeError> {
        self.count("BusyWorkers")
    }

    pub fn idle_workers(&self) -> Result<u64, ProbeError> {
        self.count("IdleWorkers")
    }

    /// Number of scoreboard slots, i.e. the worker capacity.
    pub fn max_workers(&self) -> Result<u64, ProbeError> {
        Ok(self.require("Scoreboard")?.chars().count() as u64)
    }

    pub fn uptime(&self) -> Option<u64> {
        self.get("Uptime").and_then(|v| v.parse().ok())
    }

    pub fn bytes_per_sec(&self) -> Option<f64> {
        self.get("BytesPerSec").and_then(|v| v.parse().ok())
    }

    /// Product token of `ServerVersion`, e.g. `Apache/2.4.57`.
    pub fn version(&self) -> &str {
        self.get("ServerVersion")
            .and_then(|v| v.split_whitespace().next())
            .unwrap_or("Apache2")
    }
}

/// A configured Apache check.
#[derive(Debug, Clone)]
pub struct ApacheCheck {
    worker_thresholds: Thresholds,
    min_idle_workers: u64,
}

impl ApacheCheck {
    pub fn new(worker_thresholds: Thresholds, min_idle_workers: u64) -> Self {
        Self {
            worker_thresholds,
            min_idle_workers,
        }
    }

    pub fn from_config(config: &ApacheConfig) -> Result<Self, ProbeError> {
        let thresholds = Thresholds::new(config.worker_warn_percent, config.worker_crit_percent)?;
        Ok(Self::new(thresholds, config.min_idle_workers))
    }

    /// Fetch, rate against `store`, evaluate. `now` is a unix timestamp.
    pub async fn run<S, R>(&self, source: &S, store: &R, now: u64) -> Result<CheckResult, ProbeError>
    where
        S: StatusSource,
        R: RateStore,
    {
        let previous = store.load();

        let page = source.fetch_status().await?;
        if !(200..300).contains(&page.status) {
            tracing::warn!(status = page.status, "Status page returned an error");
            return Ok(CheckResult::from_verdicts(
                format!("status page returned HTTP {}", page.status),
                &[Verdict::instance(Severity::Critical, format!("HTTP status {}", page.status))],
                Vec::new(),
            ));
        }

        let status = ServerStatus::parse(&page.body);
        let current = RateRecord {
            timestamp: now,
            counter: status.total_accesses()?,
        };
        store.store(&current)?;

        let previous = match previous {
            Loaded::Found(record) => record,
            Loaded::Missing => {
                return Err(ProbeError::StateUnavailable(format!(
                    "{} does not exist, please run the check again.",
                    store.describe()
                )))
            }
            Loaded::Corrupt(reason) => {
                return Err(ProbeError::StateUnavailable(format!(
                    "{} is unreadable ({}), please run the check again.",
                    store.describe(),
                    reason
                )))
            }
        };

        self.evaluate(&status, current.rate_since(&previous))
    }

    /// Evaluate a parsed status page given the computed request rate.
    pub fn evaluate(&self, status: &ServerStatus, req_per_sec: f64) -> Result<CheckResult, ProbeError> {
        let busy = status.busy_workers()?;
        let idle = status.idle_workers()?;
        let max = status.max_workers()?;
        let total = busy.saturating_add(idle);
        let uptime = status.uptime().unwrap_or(0);
        let bytes_per_sec = status.bytes_per_sec().unwrap_or(0.0);

        let mut verdicts = Vec::new();
        if idle < self.min_idle_workers {
            verdicts.push(Verdict::instance(
                Severity::Warning,
                format!("IdleWorkers {} < {}", idle, self.min_idle_workers),
            ));
        }
        // An empty scoreboard carries no capacity to measure against.
        let usage = match max {
            0 => Severity::Ok,
            max => evaluate_usage(total, max, &self.worker_thresholds),
        };
        if usage != Severity::Ok {
            verdicts.push(Verdict::instance(
                usage,
                format!("TotalWorkers {}/{} in use", total, max),
            ));
        }

        let summary = format!(
            "{} uptime {}s, {:.2} req/s, {:.2} B/s, {} workers (busy {}, idle {})",
            status.version(),
            uptime,
            req_per_sec,
            bytes_per_sec,
            total,
            busy,
            idle
        );

        let mut total_workers = PerfDatum::new("total_workers", total);
        if max > 0 {
            let (warn, crit) = self.worker_thresholds.bounds(max);
            total_workers = total_workers
                .thresholds(Some(warn.into()), Some(crit.into()))
                .range(Some(0u64.into()), Some(PerfValue::from(max)));
        }
        let metrics = vec![
            PerfDatum::new("uptime", uptime).unit("s"),
            PerfDatum::new("req_per_sec", req_per_sec),
            PerfDatum::new("bytes_per_sec", bytes_per_sec),
            PerfDatum::new("busy_workers", busy),
            PerfDatum::new("idle_workers", idle),
            total_workers,
        ];

        let result = CheckResult::from_verdicts(summary, &verdicts, metrics);
        tracing::info!(severity = %result.severity, req_per_sec, "Apache check evaluated");
        Ok(result)
    }
}
