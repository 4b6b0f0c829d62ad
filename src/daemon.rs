//! The event loop: owns the single datagram socket, multiplexes inbound
//! packets, periodic broadcasts, and neighbor-liveness sweeps.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::clock::{jitter_secs, Clock, SystemClock};
use crate::config::Topology;
use crate::engine;
use crate::model::neighbor::{LocalNode, NeighborTable, INFINITY};
use crate::reporter;
use crate::transport::UdpTransport;
use crate::wire::{encode_frame, parse_frame, serialize_body};

pub const BROADCAST_INTERVAL_SECS: f64 = 3.0;
pub const LIVENESS_TIMEOUT_SECS: f64 = 16.0;
pub const MAX_JITTER_SECS: f64 = 3.0;

pub struct RouterDaemon {
    local: LocalNode,
    table: NeighborTable,
    transport: UdpTransport,
    clock: SystemClock,
    msg_seq: u64,
}

impl RouterDaemon {
    pub fn new(topology: Topology, bind_address: &str, bind_port: u16) -> Result<Self> {
        let transport = UdpTransport::bind(bind_address, bind_port)
            .with_context(|| format!("failed to bind UDP socket on {bind_address}:{bind_port}"))?;
        Ok(Self {
            local: topology.local,
            table: topology.table,
            transport,
            clock: SystemClock::new(),
            msg_seq: 0,
        })
    }

    pub fn run_forever(&mut self) -> Result<()> {
        info!(
            node = %self.local.name,
            bind = %self.local.ip,
            port = self.local.port,
            neighbors = self.table.len(),
            "routingd starting"
        );

        self.broadcast()?;

        loop {
            self.run_iteration()?;
        }
    }

    fn run_iteration(&mut self) -> Result<()> {
        let now = self.clock.now();
        if self.timeout_sweep(now) {
            reporter::render(&self.local, &self.table, now as u64);
        }
        self.resurrection_sweep(now);

        if now - self.local.last_send_time >= BROADCAST_INTERVAL_SECS {
            self.broadcast()?;
        }

        let wait = Duration::from_secs_f64(BROADCAST_INTERVAL_SECS + jitter_secs(MAX_JITTER_SECS));
        match self.transport.recv(wait) {
            Ok(Some((raw, _addr))) => {
                self.handle_packet(&raw);
                let now = self.clock.now();
                if self.timeout_sweep(now) {
                    reporter::render(&self.local, &self.table, now as u64);
                }
            }
            Ok(None) => {}
            Err(err) => {
                warn!("recv error, continuing: {err}");
            }
        }

        Ok(())
    }

    /// Step 1: for each adjacent neighbor, a liveness timeout poisons the
    /// route. A dead neighbor can also be someone else's next hop, so any
    /// destination routed through it is poisoned in the same pass rather
    /// than left to go stale until a packet happens to correct it. Returns
    /// whether any transition happened (caller re-renders).
    fn timeout_sweep(&mut self, now: f64) -> bool {
        let mut died = Vec::new();
        for record in self.table.iter_mut() {
            if record.adjacent
                && record.alive
                && (now - record.last_receive_time) >= LIVENESS_TIMEOUT_SECS
            {
                record.alive = false;
                record.distance = INFINITY;
                died.push(record.name);
            }
        }

        if died.is_empty() {
            return false;
        }

        for record in self.table.iter_mut() {
            if died.contains(&record.next_hop) && record.distance < INFINITY {
                record.distance = INFINITY;
                record.next_hop = '-';
            }
        }

        true
    }

    /// Step 2: any neighbor with a finite distance but `alive = false` is
    /// resurrected with a grace period before it can be timed out again.
    fn resurrection_sweep(&mut self, now: f64) {
        for record in self.table.iter_mut() {
            if record.distance < INFINITY && !record.alive {
                record.alive = true;
                record.last_receive_time = now + LIVENESS_TIMEOUT_SECS / 2.0;
            }
        }
    }

    fn broadcast(&mut self) -> Result<()> {
        let body = serialize_body(self.local.name, &self.table);
        self.msg_seq += 1;
        let frame = encode_frame(self.msg_seq, &body);

        let targets: Vec<(String, u16)> = self
            .table
            .adjacents()
            .map(|record| (record.ip.clone(), record.port))
            .collect();

        for (ip, port) in targets {
            if let Err(err) = self.transport.send(&frame, &ip, port) {
                warn!("send to {ip}:{port} failed, will retry next cycle: {err}");
            }
        }

        self.local.last_send_time = self.clock.now();
        Ok(())
    }

    fn handle_packet(&mut self, raw: &str) {
        let Some(parsed) = parse_frame(raw) else {
            debug!("dropped packet with no terminator");
            return;
        };

        if self.table.index_of(parsed.sender).is_none() {
            debug!(sender = %parsed.sender, "dropped packet from unknown sender");
            return;
        }

        let now = self.clock.now();
        let changed = engine::apply(&self.local, &mut self.table, parsed.sender, &parsed.triplets, now);
        if changed {
            reporter::render(&self.local, &self.table, now as u64);
        }
    }
}
