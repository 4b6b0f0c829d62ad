//! Renders the routing table to stdout whenever it materially changes
//! This is intentionally a thin pretty-printer, not a structured API:
//! table rendering is an external collaborator whose only contract is the
//! text format below.

use tracing::info;

use crate::model::neighbor::{LocalNode, NeighborTable, INFINITY};

/// Render the table in the prescribed format, to stdout, and emit a
/// matching `tracing` event for process supervision.
pub fn render(local: &LocalNode, table: &NeighborTable, epoch_seconds: u64) {
    let rendered = format_table(local, table, epoch_seconds);
    println!("{rendered}");
    info!(node = %local.name, time = epoch_seconds, "routing table updated");
}

fn format_table(local: &LocalNode, table: &NeighborTable, epoch_seconds: u64) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Routing table for node {} at time {}\n\n",
        local.name, epoch_seconds
    ));
    out.push_str("Node\tCost\n\n");
    for record in table.iter() {
        let cost = if record.distance >= INFINITY {
            "Infinity".to_string()
        } else {
            record.distance.to_string()
        };
        out.push_str(&format!("{}\t{}\n", record.name, cost));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::neighbor::NeighborRecord;

    #[test]
    fn format_matches_expected_layout() {
        let local = LocalNode {
            name: 'A',
            ip: "10.0.0.1".into(),
            port: 5000,
            last_send_time: 0.0,
        };
        let mut b = NeighborRecord::new('B', "10.0.0.2".into(), 5000, 0.0);
        b.distance = 4;
        let c = NeighborRecord::new('C', "10.0.0.3".into(), 5000, 0.0);
        let table = NeighborTable::new(vec![b, c]);

        let rendered = format_table(&local, &table, 42);
        assert!(rendered.starts_with("Routing table for node A at time 42\n\n"));
        assert!(rendered.contains("Node\tCost\n\n"));
        assert!(rendered.contains("B\t4\n"));
        assert!(rendered.contains("C\tInfinity\n"));
    }
}
