//! Text wire format: `<msg_seq> <sender_name> (<next_hop> <dest_name>
//! <distance>)* *`, whitespace-delimited, terminated by a literal `*`.
//!
//! Serialization is deterministic given the table; the triplet body (no
//! seq prefix) is a pure function of table state so callers can diff
//! pre/post bodies for change detection without re-parsing.

use crate::model::neighbor::{NeighborTable, INFINITY};

/// One `(next_hop, dest, distance)` triplet parsed off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triplet {
    pub next_hop: char,
    pub dest: char,
    pub distance: u32,
}

/// A parsed header: sender plus whatever triplets were valid before parsing
/// halted (fail-soft — halts at the first malformed triplet, keeps the
/// rest).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHeader {
    pub msg_seq: u64,
    pub sender: char,
    pub triplets: Vec<Triplet>,
}

/// Maximum on-wire packet size: sufficient for <=20 nodes given the text
/// format.
pub const MAX_PACKET_BYTES: usize = 1000;

/// Serialize the triplet body only (sender + triplets + `*`), with no
/// `msg_seq` prefix. Single-space delimiters, no trailing space before `*`.
pub fn serialize_body(sender: char, table: &NeighborTable) -> String {
    let mut out = String::new();
    out.push(sender);
    for record in table.iter() {
        out.push(' ');
        out.push(record.next_hop);
        out.push(' ');
        out.push(record.name);
        out.push(' ');
        out.push_str(&record.distance.to_string());
    }
    out.push_str(" *");
    out
}

/// Prefix the `msg_seq` to a body produced by [`serialize_body`], producing
/// the frame that actually goes on the wire.
pub fn encode_frame(msg_seq: u64, body: &str) -> String {
    format!("{msg_seq} {body}")
}

/// Truncate a raw receive buffer at (and including) the first `*` token,
/// discarding anything past it. Returns `None` if no terminator is present.
pub fn truncate_at_terminator(raw: &str) -> Option<&str> {
    let pos = raw.find('*')?;
    Some(&raw[..=pos])
}

/// Parse a full frame (`msg_seq sender (next_hop dest distance)* *`).
///
/// Malformed input (missing terminator, non-numeric distance, a triplet cut
/// short) halts parsing at the first invalid triplet; everything parsed
/// before that point is returned rather than discarded (fail-soft).
pub fn parse_frame(raw: &str) -> Option<ParsedHeader> {
    let truncated = truncate_at_terminator(raw)?;
    let mut tokens = truncated.split_whitespace();

    let msg_seq: u64 = tokens.next()?.parse().ok()?;
    let sender = first_char(tokens.next()?)?;

    let mut triplets = Vec::new();
    loop {
        let Some(tok) = tokens.next() else { break };
        if tok == "*" {
            break;
        }
        let Some(next_hop) = first_char(tok) else {
            break;
        };
        let Some(dest_tok) = tokens.next() else {
            break;
        };
        if dest_tok == "*" {
            break;
        }
        let Some(dest) = first_char(dest_tok) else {
            break;
        };
        let Some(dist_tok) = tokens.next() else {
            break;
        };
        if dist_tok == "*" {
            break;
        }
        let Ok(distance) = dist_tok.parse::<u32>() else {
            break;
        };
        triplets.push(Triplet {
            next_hop,
            dest,
            distance: distance.min(INFINITY),
        });
    }

    Some(ParsedHeader {
        msg_seq,
        sender,
        triplets,
    })
}

fn first_char(tok: &str) -> Option<char> {
    tok.chars().next()
}
