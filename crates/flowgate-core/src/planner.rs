// ── Flow planning ──
//
// Turns the controller's flat hop list into one forwarding segment per
// switch on the path, in path order. Pure; no I/O.
//
// A host-exclusive route lists each switch as an (ingress, egress) pair
// after the source switch's egress and before the destination switch's
// ingress:
//
//   [s1:out, s2:in, s2:out, s3:in]   src=3, dst=5
//     → (s1, 3, out) (s2, in, out) (s3, in, 5)
//
// Floodlight instead returns host-inclusive routes, where the first and
// last entries are the host-facing ports themselves:
//
//   [s1:3, s1:1, s2:2, s2:5]
//
// Those entries are dropped before pairing, so both shapes plan the same.

use crate::model::{FlowSegment, Hop, Route};

/// Stateless route → segment translator.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowPlanner;

impl FlowPlanner {
    /// Forward-direction segments from student (`src_host_port`) to server
    /// (`dst_host_port`). Reverse segments are `FlowSegment::reversed`.
    pub fn plan(route: &Route, src_host_port: u32, dst_host_port: u32) -> Vec<FlowSegment> {
        let hops = route.hops();
        let Some(first) = hops.first() else {
            return Vec::new();
        };

        let hops = if is_host_inclusive(hops, src_host_port) {
            match hops.get(1..hops.len() - 1) {
                Some(inner) if !inner.is_empty() => inner,
                // Both hosts on one switch.
                _ => {
                    return vec![FlowSegment::new(
                        first.switch_id.clone(),
                        src_host_port,
                        dst_host_port,
                    )];
                }
            }
        } else {
            hops
        };

        pair_segments(hops, src_host_port, dst_host_port)
    }
}

fn is_host_inclusive(hops: &[Hop], src_host_port: u32) -> bool {
    match hops {
        [first, second, ..] => first.port == src_host_port && first.switch_id == second.switch_id,
        _ => false,
    }
}

fn pair_segments(hops: &[Hop], src_host_port: u32, dst_host_port: u32) -> Vec<FlowSegment> {
    let (Some(first), Some(last)) = (hops.first(), hops.last()) else {
        return Vec::new();
    };

    let mut segments = Vec::with_capacity(hops.len() / 2 + 2);
    segments.push(FlowSegment::new(
        first.switch_id.clone(),
        src_host_port,
        first.port,
    ));

    for pair in hops.get(1..).unwrap_or_default().chunks_exact(2) {
        if let [ingress, egress] = pair {
            if ingress.switch_id == egress.switch_id {
                segments.push(FlowSegment::new(
                    ingress.switch_id.clone(),
                    ingress.port,
                    egress.port,
                ));
            }
        }
    }

    segments.push(FlowSegment::new(
        last.switch_id.clone(),
        last.port,
        dst_host_port,
    ));
    segments
}
