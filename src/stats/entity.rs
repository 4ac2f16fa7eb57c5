//! Typed entities built from a stats snapshot.
//!
//! # Responsibilities
//! - Decide the variant of each row once, from the `svname` discriminator
//! - Parse numeric counters, treating an unset session limit as "no limit"
//! - Keep row order so reports list entities in the order HAProxy does
//!
//! # Design Decisions
//! - `Entity` is a closed enum; nothing downstream probes fields to guess a shape
//! - Entities are immutable once built
//! - A single bad row fails the whole build; no partial inventory escapes

use std::fmt;

use crate::error::ProbeError;
use crate::stats::parser::StatsSnapshot;

/// Discriminator value selecting a frontend row.
pub const FRONTEND_SENTINEL: &str = "FRONTEND";
/// Discriminator value selecting a backend row.
pub const BACKEND_SENTINEL: &str = "BACKEND";

/// The three kinds of reporting unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Frontend,
    Backend,
    Server,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Frontend => "frontend",
            EntityKind::Backend => "backend",
            EntityKind::Server => "server",
        }
    }

    /// Whether `status` is a healthy operational state for this kind.
    pub fn accepts_status(self, status: &str) -> bool {
        match self {
            EntityKind::Frontend => status == "OPEN",
            EntityKind::Backend => status == "UP",
            EntityKind::Server => status.starts_with("UP") || status == "no check",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters common to every entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyStats {
    pub name: String,
    pub status: String,
    pub current_sessions: u64,
    /// `None` when the source reports no limit.
    pub session_limit: Option<u64>,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

/// An individual backend member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStats {
    pub stats: ProxyStats,
    /// Name of the owning backend.
    pub backend: String,
    pub total_sessions: u64,
    pub queued_sessions: u64,
}

/// One row of the snapshot, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Frontend(ProxyStats),
    Backend(ProxyStats),
    Server(ServerStats),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Frontend(_) => EntityKind::Frontend,
            Entity::Backend(_) => EntityKind::Backend,
            Entity::Server(_) => EntityKind::Server,
        }
    }

    pub fn stats(&self) -> &ProxyStats {
        match self {
            Entity::Frontend(stats) | Entity::Backend(stats) => stats,
            Entity::Server(server) => &server.stats,
        }
    }

    /// Name used in messages; servers are qualified by their backend.
    pub fn display_name(&self) -> String {
        match self {
            Entity::Server(server) => format!("{}/{}", server.backend, server.stats.name),
            other => other.stats().name.clone(),
        }
    }
}

/// Column positions resolved once per snapshot.
#[derive(Debug, Clone, Copy)]
struct Columns {
    pxname: usize,
    svname: usize,
    status: usize,
    scur: usize,
    slim: usize,
    stot: usize,
    qcur: usize,
    bin: usize,
    bout: usize,
}

impl Columns {
    fn resolve(snapshot: &StatsSnapshot) -> Result<Self, ProbeError> {
        Ok(Self {
            pxname: snapshot.column("pxname")?,
            svname: snapshot.column("svname")?,
            status: snapshot.column("status")?,
            scur: snapshot.column("scur")?,
            slim: snapshot.column("slim")?,
            stot: snapshot.column("stot")?,
            qcur: snapshot.column("qcur")?,
            bin: snapshot.column("bin")?,
            bout: snapshot.column("bout")?,
        })
    }
}

/// A single row plus the context needed for error messages.
struct Row<'a> {
    fields: &'a [String],
    number: usize,
}

impl<'a> Row<'a> {
    fn text(&self, col: usize) -> &'a str {
        self.fields[col].as_str()
    }

    fn count(&self, col: usize, column: &str) -> Result<u64, ProbeError> {
        let raw = self.text(col).trim();
        raw.parse::<u64>().map_err(|_| {
            ProbeError::MalformedStats(format!(
                "row {}: column '{}' is not numeric: '{}'",
                self.number, column, raw
            ))
        })
    }

    fn limit(&self, col: usize) -> Result<Option<u64>, ProbeError> {
        match self.text(col).trim() {
            "" | "-" => Ok(None),
            _ => self.count(col, "slim").map(|limit| (limit > 0).then_some(limit)),
        }
    }
}

impl Entity {
    fn from_row(row: &Row<'_>, cols: &Columns) -> Result<Self, ProbeError> {
        let proxy = row.text(cols.pxname);
        let svname = row.text(cols.svname);

        let stats = |name: &str| -> Result<ProxyStats, ProbeError> {
            Ok(ProxyStats {
                name: name.to_string(),
                status: row.text(cols.status).to_string(),
                current_sessions: row.count(cols.scur, "scur")?,
                session_limit: row.limit(cols.slim)?,
                bytes_in: row.count(cols.bin, "bin")?,
                bytes_out: row.count(cols.bout, "bout")?,
            })
        };

        let entity = match svname {
            FRONTEND_SENTINEL => Entity::Frontend(stats(proxy)?),
            BACKEND_SENTINEL => Entity::Backend(stats(proxy)?),
            server => Entity::Server(ServerStats {
                stats: stats(server)?,
                backend: proxy.to_string(),
                total_sessions: row.count(cols.stot, "stot")?,
                queued_sessions: row.count(cols.qcur, "qcur")?,
            }),
        };
        Ok(entity)
    }
}

/// All entities of one snapshot, in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    entities: Vec<Entity>,
}

impl Inventory {
    /// Classify every row of `snapshot`.
    pub fn build(snapshot: &StatsSnapshot) -> Result<Self, ProbeError> {
        let cols = Columns::resolve(snapshot)?;

        let entities = snapshot
            .rows()
            .iter()
            .enumerate()
            .map(|(i, fields)| {
                let row = Row {
                    fields,
                    number: i + 1,
                };
                Entity::from_row(&row, &cols)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let inventory = Self { entities };
        tracing::debug!(
            frontends = inventory.frontends().count(),
            backends = inventory.backends().count(),
            servers = inventory.servers().count(),
            "Built entity inventory"
        );
        Ok(inventory)
    }

    pub fn from_entities(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    pub fn frontends(&self) -> impl Iterator<Item = &ProxyStats> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Frontend(stats) => Some(stats),
            _ => None,
        })
    }

    pub fn backends(&self) -> impl Iterator<Item = &ProxyStats> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Backend(stats) => Some(stats),
            _ => None,
        })
    }

    pub fn servers(&self) -> impl Iterator<Item = &ServerStats> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Server(server) => Some(server),
            _ => None,
        })
    }

    /// Frontends, then backends, then servers; row order within each group.
    pub fn in_evaluation_order(&self) -> impl Iterator<Item = &Entity> {
        [EntityKind::Frontend, EntityKind::Backend, EntityKind::Server]
            .into_iter()
            .flat_map(move |kind| self.entities.iter().filter(move |e| e.kind() == kind))
    }

    /// Find an entity of `kind` by name.
    ///
    /// Servers match either `backend/server` or, without a `/`, the first
    /// server with that name.
    pub fn find(&self, kind: EntityKind, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| {
            if entity.kind() != kind {
                return false;
            }
            match entity {
                Entity::Server(server) => match name.split_once('/') {
                    Some((backend, server_name)) => {
                        server.backend == backend && server.stats.name == server_name
                    }
                    None => server.stats.name == name,
                },
                other => other.stats().name == name,
            }
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::parser::parse;

    const HEADER: &str = "# pxname,svname,qcur,scur,slim,stot,bin,bout,status,";

    fn snapshot(rows: &[&str]) -> StatsSnapshot {
        let mut raw = String::from(HEADER);
        raw.push('\n');
        for row in rows {
            raw.push_str(row);
            raw.push('\n');
        }
        parse(&raw).unwrap()
    }

    #[test]
    fn discriminator_selects_variant() {
        let inv = Inventory::build(&snapshot(&[
            "www,FRONTEND,,10,100,500,1024,2048,OPEN,",
            "app,BACKEND,0,4,,300,512,1024,UP,",
            "app,web1,0,4,50,300,512,1024,UP,",
        ]))
        .unwrap();

        let kinds: Vec<_> = inv.in_evaluation_order().map(Entity::kind).collect();
        assert_eq!(
            kinds,
            [EntityKind::Frontend, EntityKind::Backend, EntityKind::Server]
        );

        let server = inv.servers().next().unwrap();
        assert_eq!(server.backend, "app");
        assert_eq!(server.stats.name, "web1");
        assert_eq!(server.stats.session_limit, Some(50));
        assert_eq!(server.total_sessions, 300);
    }

    #[test]
    fn non_sentinel_discriminator_is_a_server() {
        let inv = Inventory::build(&snapshot(&["web1,frontend,0,10,100,1,0,0,OPEN,"])).unwrap();
        assert_eq!(inv.frontends().count(), 0);
        assert_eq!(inv.servers().count(), 1);
    }

    #[test]
    fn unset_limit_is_none() {
        let inv = Inventory::build(&snapshot(&[
            "a,FRONTEND,,1,,0,0,0,OPEN,",
            "b,FRONTEND,,1,-,0,0,0,OPEN,",
            "c,FRONTEND,,1,0,0,0,0,OPEN,",
        ]))
        .unwrap();
        assert!(inv.frontends().all(|f| f.session_limit.is_none()));
    }

    #[test]
    fn frontend_ignores_empty_queue_column() {
        let inv = Inventory::build(&snapshot(&["www,FRONTEND,,3,10,9,1,2,OPEN,"])).unwrap();
        let frontend = inv.frontends().next().unwrap();
        assert_eq!(frontend.current_sessions, 3);
        assert_eq!(frontend.bytes_in, 1);
        assert_eq!(frontend.bytes_out, 2);
    }

    #[test]
    fn non_numeric_counter_is_malformed() {
        let err = Inventory::build(&snapshot(&[
            "www,FRONTEND,,3,10,9,1,2,OPEN,",
            "app,web1,0,lots,10,9,1,2,UP,",
        ]))
        .unwrap_err();
        match err {
            ProbeError::MalformedStats(msg) => {
                assert!(msg.contains("row 2"));
                assert!(msg.contains("scur"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn garbage_limit_is_malformed() {
        assert!(matches!(
            Inventory::build(&snapshot(&["www,FRONTEND,,3,many,9,1,2,OPEN,"])),
            Err(ProbeError::MalformedStats(_))
        ));
    }

    #[test]
    fn missing_required_column() {
        let snapshot = parse("# pxname,svname,status\nwww,FRONTEND,OPEN\n").unwrap();
        assert!(matches!(
            Inventory::build(&snapshot),
            Err(ProbeError::MissingColumn(name)) if name == "scur"
        ));
    }

    #[test]
    fn evaluation_order_groups_by_kind() {
        let inv = Inventory::build(&snapshot(&[
            "app,web1,0,1,,1,0,0,UP,",
            "app,BACKEND,0,1,,1,0,0,UP,",
            "www,FRONTEND,,1,,1,0,0,OPEN,",
            "api,FRONTEND,,1,,1,0,0,OPEN,",
        ]))
        .unwrap();
        let names: Vec<_> = inv.in_evaluation_order().map(Entity::display_name).collect();
        assert_eq!(names, ["www", "api", "app", "app/web1"]);
    }

    #[test]
    fn find_servers_by_qualified_name() {
        let inv = Inventory::build(&snapshot(&[
            "app,web1,0,1,,1,0,0,UP,",
            "static,web1,0,2,,1,0,0,UP,",
        ]))
        .unwrap();

        let found = inv.find(EntityKind::Server, "static/web1").unwrap();
        assert_eq!(found.stats().current_sessions, 2);

        let first = inv.find(EntityKind::Server, "web1").unwrap();
        assert_eq!(first.display_name(), "app/web1");

        assert!(inv.find(EntityKind::Frontend, "web1").is_none());
    }

    #[test]
    fn server_state_acceptance() {
        assert!(EntityKind::Server.accepts_status("UP"));
        assert!(EntityKind::Server.accepts_status("UP 1/3"));
        assert!(EntityKind::Server.accepts_status("no check"));
        assert!(!EntityKind::Server.accepts_status("DOWN"));
        assert!(!EntityKind::Server.accepts_status("MAINT"));
        assert!(EntityKind::Frontend.accepts_status("OPEN"));
        assert!(!EntityKind::Backend.accepts_status("UP 1/3"));
    }
}
