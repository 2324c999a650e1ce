// ── Connection manager ──
//
// Orchestrates attachment lookup, routing, planning, and installation,
// and owns the connection records. A request moves through
//
//   Requested → AttachmentsResolved → RouteComputed
//             → FlowsInstalled | PartiallyInstalled → Active
//
// and is only recorded once it reaches the install step. The record lock
// is never held across a controller call.

use std::sync::Arc;

use chrono::Utc;
use flowgate_api::FloodlightClient;
use indexmap::IndexMap;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ControllerConfig;
use crate::error::CoreError;
use crate::installer::FlowInstaller;
use crate::model::{
    AttachmentPoint, Connection, ConnectionStatus, FlowResult, FlowSegment, Host, InstalledFlow,
    MacAddress, ProvisionPhase, Route, Server, Service,
};
use crate::planner::FlowPlanner;
use crate::resolve::{AttachmentResolver, RouteResolver};

// ── Reports ──────────────────────────────────────────────────────────

/// Outcome of [`ConnectionManager::create`]: the stored record plus the
/// result of every rule push.
#[derive(Debug, Clone, Serialize)]
pub struct CreateReport {
    pub connection: Connection,
    pub results: Vec<FlowResult>,
}

impl CreateReport {
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.ok).count()
    }

    pub fn is_complete(&self) -> bool {
        self.failed() == 0
    }

    /// Turn a partial install into an error for callers that need every
    /// rule in place. The connection stays recorded either way.
    pub fn ensure_complete(self) -> Result<Self, CoreError> {
        match self.failed() {
            0 => Ok(self),
            failed => Err(CoreError::PartialInstall {
                failed,
                total: self.results.len(),
            }),
        }
    }
}

/// A diagnostic route trace between two hosts. Nothing is installed.
#[derive(Debug, Clone, Serialize)]
pub struct PathPlan {
    pub src: AttachmentPoint,
    pub dst: AttachmentPoint,
    pub route: Route,
    pub segments: Vec<FlowSegment>,
}

/// Both endpoints after the directory filled in what the catalog lacked.
struct ResolvedPath {
    student: Host,
    server: Server,
    src: AttachmentPoint,
    dst: AttachmentPoint,
    route: Route,
}

// ── Manager ──────────────────────────────────────────────────────────

pub struct ConnectionManager {
    attachments: AttachmentResolver,
    routes: RouteResolver,
    installer: FlowInstaller,
    connections: RwLock<IndexMap<String, Connection>>,
}

impl ConnectionManager {
    pub fn new(client: FloodlightClient, flow_priority: u16) -> Self {
        let client = Arc::new(client);
        Self {
            attachments: AttachmentResolver::new(Arc::clone(&client)),
            routes: RouteResolver::new(Arc::clone(&client)),
            installer: FlowInstaller::new(client).with_priority(flow_priority),
            connections: RwLock::new(IndexMap::new()),
        }
    }

    /// Build a manager (and its HTTP client) from runtime configuration.
    pub fn from_config(config: &ControllerConfig) -> Result<Self, CoreError> {
        let client = FloodlightClient::new(config.url.clone(), &config.transport())?;
        Ok(Self::new(client, config.flow_priority))
    }

    pub fn attachments(&self) -> &AttachmentResolver {
        &self.attachments
    }

    // ── Provisioning ─────────────────────────────────────────────────

    /// Authorize, resolve, route, plan, and install a new connection.
    ///
    /// Policy checks run before any controller call. Lookup and routing
    /// failures record nothing. A partial install is recorded with
    /// `ConnectionStatus::PartiallyInstalled`; an install where every
    /// push failed is reported as `ControllerUnavailable` and dropped.
    pub async fn create(
        &self,
        student: &Host,
        server: &Server,
        service: &Service,
    ) -> Result<CreateReport, CoreError> {
        if !student.authorized {
            return Err(CoreError::Unauthorized {
                student: student.name.clone(),
            });
        }
        if !server.offers(service) {
            return Err(CoreError::ServiceNotOffered {
                service: service.name.clone(),
                server: server.name.clone(),
            });
        }
        debug!(student = %student.name, server = %server.name, service = %service.name, phase = %ProvisionPhase::Requested, "connection requested");

        let path = self.resolve_path(student, server).await?;
        if path.route.is_empty() {
            return Err(no_route(&path.src, &path.dst));
        }

        let segments = FlowPlanner::plan(&path.route, path.src.port, path.dst.port);
        let results = self
            .installer
            .install(&segments, &path.student, &path.server, service)
            .await?;

        let installed_flows: Vec<InstalledFlow> = results
            .iter()
            .filter(|r| r.ok)
            .map(|r| InstalledFlow {
                name: r.flow_name.clone(),
                switch_id: r.switch_id.clone(),
            })
            .collect();

        if installed_flows.is_empty() && !results.is_empty() {
            let reason = results
                .iter()
                .find_map(|r| r.error.clone())
                .unwrap_or_else(|| "every flow push failed".into());
            return Err(CoreError::ControllerUnavailable { reason });
        }

        let (phase, status) = if installed_flows.len() == results.len() {
            (ProvisionPhase::FlowsInstalled, ConnectionStatus::Active)
        } else {
            warn!(
                failed = results.len() - installed_flows.len(),
                total = results.len(),
                "connection partially installed"
            );
            (
                ProvisionPhase::PartiallyInstalled,
                ConnectionStatus::PartiallyInstalled,
            )
        };
        debug!(phase = %phase, "flows pushed");

        let now = Utc::now();
        let connection = Connection {
            handler: Uuid::new_v4().to_string(),
            student: path.student,
            server: path.server,
            service: service.clone(),
            route: path.route,
            segments,
            installed_flows,
            status,
            created_at: now,
            updated_at: now,
        };

        self.connections
            .write()
            .await
            .insert(connection.handler.clone(), connection.clone());
        debug!(handler = %connection.handler, phase = %ProvisionPhase::Active, "connection stored");
        info!(
            handler = %connection.handler,
            student = %connection.student.name,
            server = %connection.server.name,
            service = %connection.service.name,
            status = %connection.status,
            "connection created"
        );

        Ok(CreateReport {
            connection,
            results,
        })
    }

    /// Re-resolve attachments and route for an existing connection and
    /// replace its stored route and segments. Installed rules are left as
    /// they are. When the controller now reports no path, the stored
    /// connection is kept unchanged and `NoRoute` is returned.
    pub async fn recompute(&self, handler: &str) -> Result<Connection, CoreError> {
        let current = self.get(handler).await?;

        let path = self.resolve_path(&current.student, &current.server).await?;
        if path.route.is_empty() {
            warn!(handler, "recompute found no route; keeping previous route");
            return Err(no_route(&path.src, &path.dst));
        }
        let segments = FlowPlanner::plan(&path.route, path.src.port, path.dst.port);

        let mut connections = self.connections.write().await;
        let connection = connections
            .get_mut(handler)
            .ok_or_else(|| connection_not_found(handler))?;
        connection.route = path.route;
        connection.segments = segments;
        connection.updated_at = Utc::now();
        debug!(handler, hops = connection.route.len(), "route recomputed");
        Ok(connection.clone())
    }

    /// Delete the installed rules of a connection at the controller.
    /// The record stays, minus the rules that were removed.
    ///
    /// ARP rules carry no service in their name, so two connections
    /// between the same hosts share them. A rule another stored
    /// connection still lists is left at the controller and reported as
    /// kept; it is dropped from this record only.
    pub async fn retract(&self, handler: &str) -> Result<Vec<FlowResult>, CoreError> {
        let (owned, kept) = {
            let connections = self.connections.read().await;
            let connection = connections
                .get(handler)
                .ok_or_else(|| connection_not_found(handler))?;
            let (kept, owned): (Vec<_>, Vec<_>) =
                connection.installed_flows.iter().cloned().partition(|flow| {
                    connections.iter().any(|(other, c)| {
                        other != handler && c.installed_flows.iter().any(|f| f.name == flow.name)
                    })
                });
            (owned, kept)
        };

        let mut results = self.installer.retract(&owned).await;
        results.extend(kept.into_iter().map(|flow| {
            debug!(handler, flow = %flow.name, "rule shared with another connection; kept");
            FlowResult {
                flow_name: flow.name,
                switch_id: flow.switch_id,
                ok: true,
                error: Some("kept: still used by another connection".into()),
            }
        }));

        if let Some(connection) = self.connections.write().await.get_mut(handler) {
            connection
                .installed_flows
                .retain(|f| !results.iter().any(|r| r.ok && r.flow_name == f.name));
            connection.updated_at = Utc::now();
        }
        info!(
            handler,
            retracted = owned.len() - results.iter().filter(|r| !r.ok).count(),
            total = results.len(),
            "connection flows retracted"
        );
        Ok(results)
    }

    // ── Bookkeeping ──────────────────────────────────────────────────

    /// All connections, in creation order.
    pub async fn list(&self) -> Vec<Connection> {
        self.connections.read().await.values().cloned().collect()
    }

    pub async fn get(&self, handler: &str) -> Result<Connection, CoreError> {
        self.connections
            .read()
            .await
            .get(handler)
            .cloned()
            .ok_or_else(|| connection_not_found(handler))
    }

    /// Remove a connection record. `requester` is the catalog's current
    /// record for the connection's student: it must still be authorized
    /// and carry the same MAC. Controller rules are not touched.
    pub async fn delete(&self, handler: &str, requester: &Host) -> Result<Connection, CoreError> {
        let mut connections = self.connections.write().await;
        let connection = connections
            .get(handler)
            .ok_or_else(|| connection_not_found(handler))?;

        if !requester.authorized || requester.mac != connection.student.mac {
            return Err(CoreError::Unauthorized {
                student: requester.name.clone(),
            });
        }

        let removed = connections
            .shift_remove(handler)
            .ok_or_else(|| connection_not_found(handler))?;
        info!(handler, student = %removed.student.name, "connection deleted");
        Ok(removed)
    }

    /// Drop every record. Returns how many were removed.
    pub async fn clear(&self) -> usize {
        let mut connections = self.connections.write().await;
        let count = connections.len();
        connections.clear();
        if count > 0 {
            info!(count, "connections cleared");
        }
        count
    }

    // ── Diagnostics ──────────────────────────────────────────────────

    /// Resolve and plan the path between two MACs without installing.
    /// An empty route is returned as-is with no segments.
    pub async fn trace(&self, src: &MacAddress, dst: &MacAddress) -> Result<PathPlan, CoreError> {
        let src = self.attachments.resolve(src).await?;
        let dst = self.attachments.resolve(dst).await?;
        let route = self.routes.route(&src, &dst).await?;
        let segments = FlowPlanner::plan(&route, src.port, dst.port);
        Ok(PathPlan {
            src,
            dst,
            route,
            segments,
        })
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn resolve_path(&self, student: &Host, server: &Server) -> Result<ResolvedPath, CoreError> {
        let student_loc = self.attachments.locate(&student.mac).await?;
        let server_loc = match &server.mac {
            Some(mac) => self.attachments.locate(mac).await?,
            None => self.attachments.locate_ip(server.ip).await?,
        };
        debug!(
            src = %student_loc.attachment,
            dst = %server_loc.attachment,
            phase = %ProvisionPhase::AttachmentsResolved,
            "attachments resolved"
        );

        let student = Host {
            ip: student.ip.or_else(|| student_loc.ipv4.first().copied()),
            ..student.clone()
        };
        let server = Server {
            mac: Some(server_loc.mac),
            ..server.clone()
        };

        let route = self
            .routes
            .route(&student_loc.attachment, &server_loc.attachment)
            .await?;
        debug!(hops = route.len(), phase = %ProvisionPhase::RouteComputed, "route computed");

        Ok(ResolvedPath {
            student,
            server,
            src: student_loc.attachment,
            dst: server_loc.attachment,
            route,
        })
    }
}

fn no_route(src: &AttachmentPoint, dst: &AttachmentPoint) -> CoreError {
    CoreError::NoRoute {
        src: src.to_string(),
        dst: dst.to_string(),
    }
}

fn connection_not_found(handler: &str) -> CoreError {
    CoreError::ConnectionNotFound {
        handler: handler.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FlowResult, Protocol};

    fn result(ok: bool) -> FlowResult {
        FlowResult {
            flow_name: "fg-arp-fwd-0-aabbcc000001-aabbcc000002".into(),
            switch_id: "00:00:00:00:00:00:00:01".into(),
            ok,
            error: (!ok).then(|| "HTTP 500".into()),
        }
    }

    fn report(results: Vec<FlowResult>) -> CreateReport {
        let now = Utc::now();
        let service = Service {
            name: "ssh".into(),
            protocol: Protocol::Tcp,
            port: 22,
        };
        CreateReport {
            connection: Connection {
                handler: "h".into(),
                student: Host {
                    name: "alice".into(),
                    mac: MacAddress::new("aa:bb:cc:00:00:01"),
                    ip: None,
                    authorized: true,
                },
                server: Server {
                    name: "lab".into(),
                    ip: std::net::Ipv4Addr::new(10, 0, 0, 2),
                    mac: None,
                    services: vec![service.clone()],
                },
                service,
                route: Route::default(),
                segments: Vec::new(),
                installed_flows: Vec::new(),
                status: ConnectionStatus::Active,
                created_at: now,
                updated_at: now,
            },
            results,
        }
    }

    #[test]
    fn complete_report_passes_through() {
        let report = report(vec![result(true), result(true)]);
        assert!(report.is_complete());
        assert!(report.ensure_complete().is_ok());
    }

    #[test]
    fn partial_report_becomes_partial_install() {
        let report = report(vec![result(true), result(false), result(false)]);
        assert_eq!(report.failed(), 2);
        match report.ensure_complete() {
            Err(CoreError::PartialInstall { failed, total }) => {
                assert_eq!((failed, total), (2, 3));
            }
            other => panic!("expected PartialInstall, got {other:?}"),
        }
    }
}
