//! Loads the two plain-text configuration files: the node address table
//! and the adjacency-cost table. Produces a [`Topology`] —
//! the home node plus the initial neighbor table — ready to hand to
//! [`crate::daemon::RouterDaemon`].

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::model::neighbor::{LocalNode, NeighborRecord, NeighborTable, MAX_NODES};

/// Fully resolved startup topology: the home node plus every other node's
/// record, adjacency-annotated.
#[derive(Debug)]
pub struct Topology {
    pub local: LocalNode,
    pub table: NeighborTable,
}

/// Parse the node-address file (`<name> <ipv4> <port>` per line) and the
/// adjacency-cost file (`<name_a> <name_b> <cost>` per line), and assemble
/// the topology for `home_name`.
///
/// Config errors (missing file, missing local node, malformed line, bad
/// endpoint) are fatal and reported with a context chain describing which
/// file and line caused the failure.
pub fn load_topology(nodes_path: &Path, links_path: &Path, home_name: char) -> Result<Topology> {
    let node_lines = read_lines(nodes_path)?;
    let mut local: Option<LocalNode> = None;
    let mut records: Vec<NeighborRecord> = Vec::new();

    for line in &node_lines {
        let (name, ip, port) = parse_node_line(line)
            .with_context(|| format!("malformed node line in {}: {line:?}", nodes_path.display()))?;
        if name == home_name {
            local = Some(LocalNode {
                name,
                ip,
                port,
                last_send_time: 0.0,
            });
        } else {
            records.push(NeighborRecord::new(name, ip, port, 0.0));
        }
    }

    let local = local.with_context(|| {
        format!(
            "node '{home_name}' not found; select a node from {}",
            nodes_path.display()
        )
    })?;

    if records.len() + 1 > MAX_NODES {
        bail!(
            "node table at {} names more than {MAX_NODES} nodes",
            nodes_path.display()
        );
    }

    let mut table = NeighborTable::new(records);

    let link_lines = read_lines(links_path)?;
    for line in &link_lines {
        let (a, b, cost) = parse_link_line(line)
            .with_context(|| format!("malformed link line in {}: {line:?}", links_path.display()))?;
        let other = if a == home_name {
            Some(b)
        } else if b == home_name {
            Some(a)
        } else {
            continue;
        };
        let Some(other) = other else { continue };
        let record = table.get_mut(other).with_context(|| {
            format!("adjacency line references unknown node '{other}' in {}", links_path.display())
        })?;
        record.adjacent = true;
        record.connected = true;
        record.initial_distance = cost;
        record.distance = cost;
        record.next_hop = home_name;
    }

    Ok(Topology { local, table })
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect())
}

fn parse_node_line(line: &str) -> Option<(char, String, u16)> {
    let mut parts = line.split_whitespace();
    let name = parts.next()?.chars().next()?;
    let ip = parts.next()?.to_string();
    let port: u16 = parts.next()?.parse().ok()?;
    Some((name, ip, port))
}

fn parse_link_line(line: &str) -> Option<(char, char, u32)> {
    let mut parts = line.split_whitespace();
    let a = parts.next()?.chars().next()?;
    let b = parts.next()?.chars().next()?;
    let cost: u32 = parts.next()?.parse().ok()?;
    Some((a, b, cost))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(contents: &str) -> tempfile_path::TempFile {
        tempfile_path::TempFile::new(contents)
    }

    /// Minimal scratch-file helper kept local to this test module; avoids
    /// pulling in a `tempfile` dependency for three short-lived config
    /// fixtures.
    mod tempfile_path {
        use std::fs::{self, File};
        use std::io::Write;
        use std::path::{Path, PathBuf};

        pub struct TempFile {
            path: PathBuf,
        }

        impl TempFile {
            pub fn new(contents: &str) -> Self {
                let mut path = std::env::temp_dir();
                let unique = format!(
                    "dvrs-test-{}-{:?}",
                    std::process::id(),
                    std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .unwrap()
                        .as_nanos()
                );
                path.push(unique);
                let mut f = File::create(&path).unwrap();
                f.write_all(contents.as_bytes()).unwrap();
                Self { path }
            }

            pub fn path(&self) -> &Path {
                &self.path
            }
        }

        impl Drop for TempFile {
            fn drop(&mut self) {
                let _ = fs::remove_file(&self.path);
            }
        }
    }

    #[test]
    fn loads_three_node_topology() {
        let nodes = write_temp("A 10.0.0.1 5000\nB 10.0.0.2 5000\nC 10.0.0.3 5000\n");
        let links = write_temp("A B 2\nB C 3\n");

        let topo = load_topology(nodes.path(), links.path(), 'A').unwrap();
        assert_eq!(topo.local.name, 'A');
        let b = topo.table.get('B').unwrap();
        assert!(b.adjacent);
        assert_eq!(b.initial_distance, 2);
        assert_eq!(b.next_hop, 'A');

        let c = topo.table.get('C').unwrap();
        assert!(!c.adjacent);
    }

    #[test]
    fn missing_home_node_is_fatal() {
        let nodes = write_temp("B 10.0.0.2 5000\n");
        let links = write_temp("");
        let err = load_topology(nodes.path(), links.path(), 'A').unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn link_line_for_unknown_node_is_fatal() {
        let nodes = write_temp("A 10.0.0.1 5000\nB 10.0.0.2 5000\n");
        let links = write_temp("A Z 5\n");
        let err = load_topology(nodes.path(), links.path(), 'A').unwrap_err();
        assert!(err.to_string().contains("unknown node"));
    }

    #[test]
    fn malformed_node_line_is_fatal() {
        let nodes = write_temp("A 10.0.0.1\n");
        let links = write_temp("");
        assert!(load_topology(nodes.path(), links.path(), 'A').is_err());
    }
}
