use std::collections::{HashMap, HashSet};

/// A single 18-bit X/26-family triplet, or `None` if the reader could not
/// decode it (e.g. a Hamming(24,18) parity failure upstream). Undecodable
/// triplets are tolerated: they are skipped by the walkers, never an error.
pub type Triplet = Option<u32>;

/// One enhancement packet: always exactly 13 triplets.
pub type EnhancementPacket = [Triplet; 13];

/// One Level 1 row: 40 bytes, already 7-bit-clean (high bit cleared).
pub type RowBytes = [u8; 40];

const BLANK_ROW: RowBytes = [0x20; 40];

/// Normalized input to the decoder: a single subpage's worth of packets.
///
/// Mirrors the reader contract (spec §6): readers build one `PacketMap` per
/// subpage and hand it to [`crate::Decoder::decode`]. Missing rows or
/// enhancement packets are not errors — the decoder treats them as blank
/// row / absent packet respectively (spec §7).
#[derive(Debug, Clone, Default)]
pub struct PacketMap {
    pub region: u8,
    pub control_bits: HashSet<u8>,
    rows: HashMap<u8, RowBytes>,
    enhancements: HashMap<(u8, u8), EnhancementPacket>,
}

impl PacketMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the 40-byte Level 1 row `r` (0–24).
    pub fn set_row(&mut self, r: u8, bytes: RowBytes) {
        self.rows.insert(r, bytes);
    }

    /// Row bytes for `r`, or a blank (all-space) row if `r` was never set.
    pub fn row(&self, r: u8) -> RowBytes {
        *self.rows.get(&r).unwrap_or(&BLANK_ROW)
    }

    /// Whether row `r` was explicitly supplied (as opposed to defaulted).
    pub fn has_row(&self, r: u8) -> bool {
        self.rows.contains_key(&r)
    }

    /// Store the 13-triplet enhancement packet at designation `(y, d)`.
    pub fn set_enhancement(&mut self, y: u8, d: u8, packet: EnhancementPacket) {
        self.enhancements.insert((y, d), packet);
    }

    /// The enhancement packet at `(y, d)`, or `None` if it is absent.
    pub fn enhancement(&self, y: u8, d: u8) -> Option<&EnhancementPacket> {
        self.enhancements.get(&(y, d))
    }
}
