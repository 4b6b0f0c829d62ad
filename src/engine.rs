//! The distance-vector relaxation rule (Bellman-Ford with a bounded
//! infinity metric, split-horizon, and liveness-driven poisoning).

use crate::model::neighbor::{LocalNode, NeighborRecord, NeighborTable};
use crate::wire::{serialize_body, Triplet};

/// Apply one received vector from `sender` to `table` at time `now`.
/// Returns whether the table's serialized form changed, which the event
/// loop uses to decide whether to re-render the routing table.
///
/// Unknown neighbor names referenced by a triplet are dropped without
/// aborting the rest of the packet (protocol-soft error).
///
/// The adjacency-bootstrap clause (see [`bootstrap_non_adjacent`]) is
/// applied unconditionally, even when the split-horizon guard would
/// otherwise suppress the triplet — a documented wire-compatibility quirk,
/// not an oversight.
pub fn apply(
    local: &LocalNode,
    table: &mut NeighborTable,
    sender: char,
    triplets: &[Triplet],
    now: f64,
) -> bool {
    let before = serialize_body(local.name, table);

    let Some(sender_record) = table.get_mut(sender) else {
        return false;
    };
    sender_record.last_receive_time = now;
    sender_record.alive = true;

    for triplet in triplets {
        apply_triplet(local, table, sender, *triplet);
    }

    let after = serialize_body(local.name, table);
    before != after
}

fn apply_triplet(local: &LocalNode, table: &mut NeighborTable, sender: char, triplet: Triplet) {
    let Triplet {
        next_hop: advertised_next_hop,
        dest,
        distance: adv_distance,
    } = triplet;

    if dest == local.name {
        // Liveness confirmation of the sender: restore its direct cost and
        // mark it alive. Does not otherwise modify the table.
        if let Some(sender_record) = table.get_mut(sender) {
            sender_record.alive = true;
            sender_record.distance = sender_record.initial_distance;
        }
        return;
    }

    let Some(sender_distance) = table.get(sender).map(|r| r.distance) else {
        return;
    };
    let candidate = NeighborRecord::saturating_cost(sender_distance, adv_distance);

    let split_horizon_blocked = advertised_next_hop == local.name;
    if !split_horizon_blocked {
        relax(table, dest, sender, candidate);
    }

    bootstrap_non_adjacent(table, dest, candidate);
}

/// Strict `<` relaxation: equal-cost advertisements never displace the
/// current next hop, which is what keeps converged routes stable.
fn relax(table: &mut NeighborTable, dest: char, sender: char, candidate: u32) {
    let Some(dest_record) = table.get_mut(dest) else {
        return;
    };
    if candidate < dest_record.distance {
        dest_record.distance = candidate;
        dest_record.next_hop = sender;
        dest_record.connected = true;
    }
}

/// Seeds first knowledge of a non-adjacent destination unconditionally,
/// bypassing the split-horizon guard above. This is an intentional,
/// documented anomaly: it can briefly record a route that uses the local
/// node as its own next hop when the split-horizon guard would otherwise
/// have suppressed the triplet, but is kept for wire compatibility with
/// how existing deployments bootstrap a brand-new destination.
fn bootstrap_non_adjacent(table: &mut NeighborTable, dest: char, candidate: u32) {
    let Some(dest_record) = table.get_mut(dest) else {
        return;
    };
    if !dest_record.adjacent {
        dest_record.distance = candidate;
    }
}
