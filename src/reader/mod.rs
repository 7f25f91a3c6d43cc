//! Reader contract (spec §6/§10): turns a page-format byte stream into the
//! `PacketMap`s the decoder consumes. One subpage per `PacketMap`, in file
//! order — `--subpage N` in the CLI indexes into the returned `Vec`
//! directly, since no page-format this crate reads guarantees subcode
//! continuity across subpages.

pub mod tti;

use std::io::BufRead;

use anyhow::Result;

use crate::packet::PacketMap;

/// A source of teletext pages. Implementations own the format-specific
/// parsing (and, where applicable, forward error correction); the decoder
/// itself never sees raw bytes.
pub trait PacketSource {
    fn read(&self, input: &mut dyn BufRead) -> Result<Vec<PacketMap>>;
}
