//! Threshold evaluation.
//!
//! # Responsibilities
//! - Check each entity's operational state against its kind's healthy values
//! - Check session usage against percentage thresholds of the entity's limit
//! - Emit structural verdicts about the instance as a whole
//!
//! # Design Decisions
//! - State mismatches are always WARNING; only usage breaches reach CRITICAL
//! - Thresholds are validated when `Thresholds` is built, before any I/O
//! - Comparisons are inclusive at both boundaries

use std::fmt;

use crate::error::ProbeError;
use crate::health::Severity;
use crate::stats::entity::{Entity, EntityKind, Inventory};

/// Validated warning/critical percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    warn_percent: u32,
    crit_percent: u32,
}

impl Thresholds {
    /// Build thresholds, requiring `warn_percent < crit_percent`.
    pub fn new(warn_percent: u32, crit_percent: u32) -> Result<Self, ProbeError> {
        if warn_percent >= crit_percent {
            return Err(ProbeError::InvalidThresholdConfiguration {
                warn: warn_percent,
                crit: crit_percent,
            });
        }
        Ok(Self {
            warn_percent,
            crit_percent,
        })
    }

    pub fn warn_percent(&self) -> u32 {
        self.warn_percent
    }

    pub fn crit_percent(&self) -> u32 {
        self.crit_percent
    }

    /// Absolute (warn, crit) bounds for a given limit.
    pub fn bounds(&self, limit: u64) -> (f64, f64) {
        // Multiply before dividing so whole-number bounds stay exact.
        let limit = limit as f64;
        (
            limit * f64::from(self.warn_percent) / 100.0,
            limit * f64::from(self.crit_percent) / 100.0,
        )
    }
}

/// What a verdict is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Entity { kind: EntityKind, name: String },
    Instance,
}

/// Outcome of one evaluated condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub subject: Subject,
    pub severity: Severity,
    pub message: String,
}

impl Verdict {
    fn entity(entity: &Entity, severity: Severity, message: String) -> Self {
        Self {
            subject: Subject::Entity {
                kind: entity.kind(),
                name: entity.display_name(),
            },
            severity,
            message,
        }
    }

    pub fn instance(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            subject: Subject::Instance,
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity.message_prefix(), self.message)
    }
}

/// Severity of `current` against `limit` under `thresholds`.
pub fn evaluate_usage(current: u64, limit: u64, thresholds: &Thresholds) -> Severity {
    let (warn, crit) = thresholds.bounds(limit);
    let current = current as f64;
    if current >= crit {
        Severity::Critical
    } else if current >= warn {
        Severity::Warning
    } else {
        Severity::Ok
    }
}

/// State and usage verdicts for a single entity.
pub fn evaluate_entity(entity: &Entity, thresholds: &Thresholds) -> Vec<Verdict> {
    let kind = entity.kind();
    let stats = entity.stats();
    let name = entity.display_name();
    let mut verdicts = Vec::new();

    if !kind.accepts_status(&stats.status) {
        verdicts.push(Verdict::entity(
            entity,
            Severity::Warning,
            format!("{} {} is {}", kind, name, stats.status),
        ));
    }

    if let Some(limit) = stats.session_limit {
        let severity = evaluate_usage(stats.current_sessions, limit, thresholds);
        if severity != Severity::Ok {
            verdicts.push(Verdict::entity(
                entity,
                severity,
                format!(
                    "{} {} is using {}/{} sessions",
                    kind, name, stats.current_sessions, limit
                ),
            ));
        }
    }

    for verdict in &verdicts {
        tracing::debug!(entity = %name, severity = %verdict.severity, "{}", verdict.message);
    }
    verdicts
}

/// Verdicts about the instance as a whole.
pub fn structural_verdicts(inventory: &Inventory) -> Vec<Verdict> {
    if inventory.is_empty() {
        vec![Verdict::instance(Severity::Critical, "no entities found")]
    } else {
        Vec::new()
    }
}

/// Every verdict for `inventory`: entity verdicts in evaluation order, then
/// structural ones.
pub fn evaluate_inventory(inventory: &Inventory, thresholds: &Thresholds) -> Vec<Verdict> {
    inventory
        .in_evaluation_order()
        .flat_map(|entity| evaluate_entity(entity, thresholds))
        .chain(structural_verdicts(inventory))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::entity::{ProxyStats, ServerStats};

    fn proxy(name: &str, status: &str, sessions: u64, limit: Option<u64>) -> ProxyStats {
        ProxyStats {
            name: name.into(),
            status: status.into(),
            current_sessions: sessions,
            session_limit: limit,
            bytes_in: 0,
            bytes_out: 0,
        }
    }

    fn defaults() -> Thresholds {
        Thresholds::new(80, 90).unwrap()
    }

    #[test]
    fn thresholds_require_warn_below_crit() {
        assert!(matches!(
            Thresholds::new(95, 90),
            Err(ProbeError::InvalidThresholdConfiguration { warn: 95, crit: 90 })
        ));
        assert!(Thresholds::new(90, 90).is_err());
        assert!(Thresholds::new(80, 90).is_ok());
    }

    #[test]
    fn critical_boundary_is_inclusive() {
        let t = defaults();
        assert_eq!(evaluate_usage(90, 100, &t), Severity::Critical);
        assert_eq!(evaluate_usage(89, 100, &t), Severity::Warning);
        assert_eq!(evaluate_usage(80, 100, &t), Severity::Warning);
        assert_eq!(evaluate_usage(79, 100, &t), Severity::Ok);
    }

    #[test]
    fn fractional_bounds() {
        // 80% of 7 = 5.6, 90% of 7 = 6.3
        let t = defaults();
        assert_eq!(evaluate_usage(5, 7, &t), Severity::Ok);
        assert_eq!(evaluate_usage(6, 7, &t), Severity::Warning);
        assert_eq!(evaluate_usage(7, 7, &t), Severity::Critical);
    }

    #[test]
    fn whole_percent_bounds_are_exact() {
        // 70 * 10 / 100 must land on 7.0, not 7.000000000000001
        let t = Thresholds::new(60, 70).unwrap();
        assert_eq!(evaluate_usage(7, 10, &t), Severity::Critical);
        assert_eq!(evaluate_usage(6, 10, &t), Severity::Warning);
    }

    #[test]
    fn no_limit_means_no_usage_verdict() {
        let entity = Entity::Frontend(proxy("www", "OPEN", u64::MAX, None));
        assert!(evaluate_entity(&entity, &defaults()).is_empty());
    }

    #[test]
    fn state_mismatch_is_warning_only() {
        let entity = Entity::Backend(proxy("app", "DOWN", 0, None));
        let verdicts = evaluate_entity(&entity, &defaults());
        assert_eq!(verdicts.len(), 1);
        assert_eq!(verdicts[0].severity, Severity::Warning);
        assert_eq!(verdicts[0].message, "backend app is DOWN");
        assert_eq!(verdicts[0].to_string(), "Warn: backend app is DOWN");
    }

    #[test]
    fn entity_can_yield_two_verdicts() {
        let entity = Entity::Server(ServerStats {
            stats: proxy("web1", "DOWN", 50, Some(50)),
            backend: "app".into(),
            total_sessions: 10,
            queued_sessions: 0,
        });
        let verdicts = evaluate_entity(&entity, &defaults());
        assert_eq!(verdicts.len(), 2);
        assert_eq!(verdicts[0].message, "server app/web1 is DOWN");
        assert_eq!(verdicts[1].severity, Severity::Critical);
        assert_eq!(verdicts[1].to_string(), "Crit: server app/web1 is using 50/50 sessions");
    }

    #[test]
    fn frontend_breach_beats_backend_state() {
        let inventory = Inventory::from_entities(vec![
            Entity::Frontend(proxy("www", "OPEN", 95, Some(100))),
            Entity::Backend(proxy("app", "DOWN", 5, None)),
        ]);
        let verdicts = evaluate_inventory(&inventory, &defaults());
        let severities: Vec<_> = verdicts.iter().map(|v| v.severity).collect();
        assert_eq!(severities, [Severity::Critical, Severity::Warning]);
        assert_eq!(
            Severity::aggregate(severities.iter().copied()),
            Severity::Critical
        );
    }

    #[test]
    fn reordering_entities_keeps_final_severity() {
        let entities = vec![
            Entity::Frontend(proxy("www", "OPEN", 85, Some(100))),
            Entity::Backend(proxy("app", "DOWN", 5, None)),
            Entity::Server(ServerStats {
                stats: proxy("web1", "UP", 95, Some(100)),
                backend: "app".into(),
                total_sessions: 0,
                queued_sessions: 0,
            }),
        ];
        let forward = Inventory::from_entities(entities.clone());
        let mut reversed_entities = entities;
        reversed_entities.reverse();
        let reversed = Inventory::from_entities(reversed_entities);

        let severity = |inv: &Inventory| {
            Severity::aggregate(evaluate_inventory(inv, &defaults()).iter().map(|v| v.severity))
        };
        assert_eq!(severity(&forward), Severity::Critical);
        assert_eq!(severity(&forward), severity(&reversed));
    }

    #[test]
    fn empty_inventory_is_critical() {
        let verdicts = evaluate_inventory(&Inventory::default(), &defaults());
        assert_eq!(verdicts.len(), 1);
        assert_eq!(verdicts[0].subject, Subject::Instance);
        assert_eq!(verdicts[0].severity, Severity::Critical);
    }
}
