// ── Flow installation ──
//
// Expands planned segments into concrete rules and pushes them through
// the static flow pusher. Each push stands alone: a rejection is recorded
// in its `FlowResult` and the remaining pushes still go out.
//
// Rule names are the idempotency key. Re-installing a connection
// overwrites its rules in place at the controller.

use std::sync::Arc;

use flowgate_api::{FloodlightClient, StaticFlowEntry};
use futures::future::join_all;
use tracing::{debug, warn};

use crate::config::DEFAULT_FLOW_PRIORITY;
use crate::error::CoreError;
use crate::model::{
    Direction, EtherType, FlowAction, FlowResult, FlowRule, FlowSegment, Host, InstalledFlow,
    MacAddress, MatchFields, RuleKind, Server, Service,
};

/// Builds and pushes the four rules of every segment.
#[derive(Debug, Clone)]
pub struct FlowInstaller {
    client: Arc<FloodlightClient>,
    priority: u16,
}

impl FlowInstaller {
    pub fn new(client: Arc<FloodlightClient>) -> Self {
        Self {
            client,
            priority: DEFAULT_FLOW_PRIORITY,
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: u16) -> Self {
        self.priority = priority;
        self
    }

    /// `fg-{kind}-{dir}-{segment}-{studentMac}-{serverMac}`, where `kind`
    /// is `arp` or `{protocol}{port}` (e.g. `tcp22`). MACs are bare hex.
    pub fn rule_name(
        kind: RuleKind,
        direction: Direction,
        segment: usize,
        student: &MacAddress,
        server: &MacAddress,
        service: &Service,
    ) -> String {
        let kind = match kind {
            RuleKind::Arp => "arp".to_owned(),
            RuleKind::Data => format!(
                "{}{}",
                service.protocol.to_string().to_ascii_lowercase(),
                service.port
            ),
        };
        format!(
            "fg-{kind}-{direction}-{segment}-{}-{}",
            student.hex(),
            server.hex()
        )
    }

    /// Four rules per segment, in order: forward data, reverse data,
    /// forward ARP, reverse ARP.
    ///
    /// Both endpoints must be fully addressed: the student needs an IPv4
    /// address and the server a MAC.
    pub fn build_rules(
        &self,
        segments: &[FlowSegment],
        student: &Host,
        server: &Server,
        service: &Service,
    ) -> Result<Vec<FlowRule>, CoreError> {
        let student_ip = student
            .ip
            .ok_or_else(|| CoreError::not_found("IPv4 address for host", &student.name))?;
        let server_mac = server
            .mac
            .as_ref()
            .ok_or_else(|| CoreError::not_found("MAC address for server", &server.name))?;

        let forward_match = |in_port| MatchFields {
            eth_type: EtherType::Ipv4,
            in_port,
            eth_src: Some(student.mac.clone()),
            eth_dst: Some(server_mac.clone()),
            ipv4_src: Some(student_ip),
            ipv4_dst: Some(server.ip),
            ip_proto: Some(service.protocol),
            tp_src: None,
            tp_dst: Some(service.port),
        };

        let mut rules = Vec::with_capacity(segments.len() * 4);
        for (idx, seg) in segments.iter().enumerate() {
            let rule = |kind, direction, match_fields, out_port| FlowRule {
                switch_id: seg.switch_id.clone(),
                name: Self::rule_name(kind, direction, idx, &student.mac, server_mac, service),
                priority: self.priority,
                kind,
                direction,
                match_fields,
                actions: vec![FlowAction::Output(out_port)],
                active: true,
            };

            let fwd = forward_match(seg.in_port);
            let rev = fwd.mirrored(seg.out_port);
            rules.push(rule(RuleKind::Data, Direction::Forward, fwd, seg.out_port));
            rules.push(rule(RuleKind::Data, Direction::Reverse, rev, seg.in_port));
            rules.push(rule(
                RuleKind::Arp,
                Direction::Forward,
                MatchFields::arp(seg.in_port),
                seg.out_port,
            ));
            rules.push(rule(
                RuleKind::Arp,
                Direction::Reverse,
                MatchFields::arp(seg.out_port),
                seg.in_port,
            ));
        }
        Ok(rules)
    }

    /// Build and push every rule for `segments`. Returns one outcome per
    /// rule, in build order, whatever the individual pushes did.
    pub async fn install(
        &self,
        segments: &[FlowSegment],
        student: &Host,
        server: &Server,
        service: &Service,
    ) -> Result<Vec<FlowResult>, CoreError> {
        let rules = self.build_rules(segments, student, server, service)?;
        Ok(self.push_all(&rules).await)
    }

    /// Push pre-built rules concurrently.
    pub async fn push_all(&self, rules: &[FlowRule]) -> Vec<FlowResult> {
        let pushes = rules.iter().map(|rule| async move {
            let entry = StaticFlowEntry::from(rule);
            let outcome = self.client.push_flow(&entry).await;
            outcome_of(&rule.name, &rule.switch_id, outcome.map(|_| ()))
        });
        let results = join_all(pushes).await;
        debug!(
            total = results.len(),
            failed = results.iter().filter(|r| !r.ok).count(),
            "pushed flow rules"
        );
        results
    }

    /// Delete previously installed rules by name.
    pub async fn retract(&self, flows: &[InstalledFlow]) -> Vec<FlowResult> {
        let deletes = flows.iter().map(|flow| async move {
            let outcome = self.client.delete_flow(&flow.name).await;
            outcome_of(&flow.name, &flow.switch_id, outcome.map(|_| ()))
        });
        join_all(deletes).await
    }
}

fn outcome_of(
    name: &str,
    switch_id: &str,
    outcome: Result<(), flowgate_api::Error>,
) -> FlowResult {
    match outcome {
        Ok(()) => FlowResult {
            flow_name: name.to_owned(),
            switch_id: switch_id.to_owned(),
            ok: true,
            error: None,
        },
        Err(e) => {
            let reason = CoreError::from(e).to_string();
            warn!(flow = name, switch = switch_id, error = %reason, "flow operation failed");
            FlowResult {
                flow_name: name.to_owned(),
                switch_id: switch_id.to_owned(),
                ok: false,
                error: Some(reason),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;
    use std::net::Ipv4Addr;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Protocol;

    fn installer() -> FlowInstaller {
        let client = FloodlightClient::new(
            "http://127.0.0.1:8080".parse().unwrap(),
            &flowgate_api::TransportConfig::default(),
        )
        .unwrap();
        FlowInstaller::new(Arc::new(client))
    }

    fn student() -> Host {
        Host {
            name: "alice".into(),
            mac: MacAddress::new("AA:BB:CC:00:00:01"),
            ip: Some(Ipv4Addr::new(10, 0, 0, 1)),
            authorized: true,
        }
    }

    fn ssh() -> Service {
        Service {
            name: "ssh".into(),
            protocol: Protocol::Tcp,
            port: 22,
        }
    }

    fn server() -> Server {
        Server {
            name: "lab".into(),
            ip: Ipv4Addr::new(10, 0, 0, 2),
            mac: Some(MacAddress::new("aa:bb:cc:00:00:02")),
            services: vec![ssh()],
        }
    }

    fn segments() -> Vec<FlowSegment> {
        vec![
            FlowSegment::new("00:00:00:00:00:00:00:01", 3, 1),
            FlowSegment::new("00:00:00:00:00:00:00:02", 2, 5),
        ]
    }

    #[test]
    fn four_rules_per_segment_with_unique_names() {
        let rules = installer()
            .build_rules(&segments(), &student(), &server(), &ssh())
            .unwrap();
        assert_eq!(rules.len(), 8);
        let names: HashSet<_> = rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names.len(), 8);
        assert!(rules.iter().all(|r| r.priority == DEFAULT_FLOW_PRIORITY));
    }

    #[test]
    fn reverse_data_rule_mirrors_forward() {
        let rules = installer()
            .build_rules(&segments(), &student(), &server(), &ssh())
            .unwrap();
        let (fwd, rev) = (&rules[0], &rules[1]);

        assert_eq!(fwd.match_fields.in_port, 3);
        assert_eq!(fwd.actions, vec![FlowAction::Output(1)]);
        assert_eq!(fwd.match_fields.tp_dst, Some(22));

        assert_eq!(rev.match_fields.in_port, 1);
        assert_eq!(rev.actions, vec![FlowAction::Output(3)]);
        assert_eq!(rev.match_fields.eth_src, fwd.match_fields.eth_dst);
        assert_eq!(rev.match_fields.eth_dst, fwd.match_fields.eth_src);
        assert_eq!(rev.match_fields.ipv4_src, fwd.match_fields.ipv4_dst);
        assert_eq!(rev.match_fields.ipv4_dst, fwd.match_fields.ipv4_src);
        assert_eq!(rev.match_fields.tp_src, Some(22));
        assert_eq!(rev.match_fields.tp_dst, None);
    }

    #[test]
    fn arp_rules_match_only_ingress() {
        let rules = installer()
            .build_rules(&segments(), &student(), &server(), &ssh())
            .unwrap();
        let (fwd_arp, rev_arp) = (&rules[6], &rules[7]);
        assert_eq!(fwd_arp.match_fields, MatchFields::arp(2));
        assert_eq!(fwd_arp.actions, vec![FlowAction::Output(5)]);
        assert_eq!(rev_arp.match_fields, MatchFields::arp(5));
        assert_eq!(rev_arp.actions, vec![FlowAction::Output(2)]);
    }

    #[test]
    fn rule_names_are_deterministic() {
        let name = FlowInstaller::rule_name(
            RuleKind::Data,
            Direction::Forward,
            0,
            &student().mac,
            server().mac.as_ref().unwrap(),
            &ssh(),
        );
        assert_eq!(name, "fg-tcp22-fwd-0-aabbcc000001-aabbcc000002");

        let arp = FlowInstaller::rule_name(
            RuleKind::Arp,
            Direction::Reverse,
            1,
            &student().mac,
            server().mac.as_ref().unwrap(),
            &ssh(),
        );
        assert_eq!(arp, "fg-arp-rev-1-aabbcc000001-aabbcc000002");
    }

    #[test]
    fn custom_priority_applies_to_every_rule() {
        let rules = installer()
            .with_priority(50_000)
            .build_rules(&segments(), &student(), &server(), &ssh())
            .unwrap();
        assert!(rules.iter().all(|r| r.priority == 50_000));
    }

    #[test]
    fn missing_student_ip_is_not_found() {
        let host = Host {
            ip: None,
            ..student()
        };
        let err = installer()
            .build_rules(&segments(), &host, &server(), &ssh())
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }
}
