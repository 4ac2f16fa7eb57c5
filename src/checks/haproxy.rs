//! HAProxy load balancer check.
//!
//! # Responsibilities
//! - Drive one stats snapshot through parse → build → evaluate → aggregate
//! - Instance mode: every frontend, backend and server of the instance
//! - Entity mode: one named frontend, backend or server
//!
//! # Design Decisions
//! - Thresholds are validated before the check is constructed, so a bad
//!   configuration never reaches the socket
//! - The stats source is injected; the check itself never opens sockets

use crate::error::ProbeError;
use crate::health::{evaluate_entity, evaluate_inventory, Thresholds};
use crate::net::StatsSource;
use crate::report::{CheckResult, PerfDatum, PerfValue};
use crate::stats::{parse, Entity, EntityKind, Inventory};

/// What the check looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// The whole instance.
    Instance,
    /// A single named entity.
    Entity { kind: EntityKind, name: String },
}

impl Mode {
    /// Combine a mode selector with an optional entity name.
    ///
    /// A name is required for entity modes and rejected for instance mode.
    pub fn select(kind: Option<EntityKind>, name: Option<String>) -> Result<Self, ProbeError> {
        match (kind, name) {
            (None, None) => Ok(Mode::Instance),
            (None, Some(_)) => Err(ProbeError::Usage(
                "--name only works with --mode frontend, backend or server".into(),
            )),
            (Some(kind), None) => Err(ProbeError::Usage(format!(
                "--mode {} requires --name",
                kind
            ))),
            (Some(kind), Some(name)) => Ok(Mode::Entity { kind, name }),
        }
    }
}

/// A configured HAProxy check.
#[derive(Debug, Clone)]
pub struct HaproxyCheck {
    command: String,
    thresholds: Thresholds,
    mode: Mode,
}

impl HaproxyCheck {
    pub fn new(command: impl Into<String>, thresholds: Thresholds, mode: Mode) -> Self {
        Self {
            command: command.into(),
            thresholds,
            mode,
        }
    }

    /// Fetch one snapshot from `source` and evaluate it.
    pub async fn run<S: StatsSource>(&self, source: &S) -> Result<CheckResult, ProbeError> {
        let raw = source.fetch_stats(&self.command).await?;
        let snapshot = parse(&raw)?;
        let inventory = Inventory::build(&snapshot)?;
        self.evaluate(&inventory)
    }

    /// Evaluate an already built inventory.
    pub fn evaluate(&self, inventory: &Inventory) -> Result<CheckResult, ProbeError> {
        let result = match &self.mode {
            Mode::Instance => check_instance(inventory, &self.thresholds),
            Mode::Entity { kind, name } => check_entity(inventory, *kind, name, &self.thresholds)?,
        };
        tracing::info!(severity = %result.severity, findings = result.messages.len(), "HAProxy check evaluated");
        Ok(result)
    }
}

/// Evaluate every entity of the instance.
pub fn check_instance(inventory: &Inventory, thresholds: &Thresholds) -> CheckResult {
    let frontends = inventory.frontends().count();
    let backends = inventory.backends().count();
    let servers = inventory.servers().count();

    let (sessions, sessions_total) = inventory
        .servers()
        .fold((0u64, 0u64), |(current, total), server| {
            (
                current.saturating_add(server.stats.current_sessions),
                total.saturating_add(server.total_sessions),
            )
        });

    let summary = format!(
        "haproxy running with {} frontends, {} backends, {} servers and {} sessions",
        frontends, backends, servers, sessions
    );

    let metrics = vec![
        PerfDatum::new("sessions", sessions),
        PerfDatum::new("sessions_total", sessions_total),
        PerfDatum::new("frontends", frontends as u64),
        PerfDatum::new("backends", backends as u64),
        PerfDatum::new("servers", servers as u64),
    ];

    let verdicts = evaluate_inventory(inventory, thresholds);
    CheckResult::from_verdicts(summary, &verdicts, metrics)
}

/// Evaluate a single named entity.
pub fn check_entity(
    inventory: &Inventory,
    kind: EntityKind,
    name: &str,
    thresholds: &Thresholds,
) -> Result<CheckResult, ProbeError> {
    let entity = inventory
        .find(kind, name)
        .ok_or_else(|| ProbeError::EntityNotFound {
            kind: kind.as_str(),
            name: name.to_string(),
        })?;
    let stats = entity.stats();

    let limit_text = stats
        .session_limit
        .map(|limit| limit.to_string())
        .unwrap_or_else(|| "-".to_string());
    let summary = format!(
        "HAProxy {} {} is {}, Sessions: {}/{}",
        kind,
        entity.display_name(),
        stats.status,
        stats.current_sessions,
        limit_text
    );

    let verdicts = evaluate_entity(entity, thresholds);
    Ok(CheckResult::from_verdicts(
        summary,
        &verdicts,
        entity_metrics(entity, thresholds),
    ))
}

fn entity_metrics(entity: &Entity, thresholds: &Thresholds) -> Vec<PerfDatum> {
    let stats = entity.stats();
    let (warn, crit) = match stats.session_limit {
        Some(limit) => {
            let (w, c) = thresholds.bounds(limit);
            (Some(PerfValue::from(w)), Some(PerfValue::from(c)))
        }
        None => (None, None),
    };

    vec![
        PerfDatum::new("sessions", stats.current_sessions)
            .thresholds(warn, crit)
            .range(Some(0u64.into()), stats.session_limit.map(PerfValue::from)),
        PerfDatum::new("bytein", stats.bytes_in).unit("B"),
        PerfDatum::new("byteout", stats.bytes_out).unit("B"),
    ]
}
