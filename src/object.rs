//! Object Resolver (spec §4.3, Level ≥ 2.5): given a parent invocation,
//! recursively discovers and walks Local Object definitions (Active /
//! Adaptive / Passive) referenced by its invoke triplets.

use std::collections::HashSet;

use crate::invocation::{walk, InvocationResult, Level2p5};
use crate::level::Level;
use crate::packet::PacketMap;
use crate::triplet::split;

/// Active, Adaptive and Passive object invocations discovered while
/// resolving a root (local) invocation.
#[derive(Debug, Default)]
pub struct ObjectInvocations {
    pub active: Vec<InvocationResult>,
    pub adaptive: Vec<InvocationResult>,
    pub passive: Vec<InvocationResult>,
}

/// Parent object type, used by the scope test (spec §4.3 step 1). `0` is
/// the root (local) invocation; `1` active; `2` adaptive.
const ROOT: u8 = 0;
const ACTIVE: u8 = 1;
const ADAPTIVE: u8 = 2;

/// Recursively resolve the invokes recorded in `invoc`, appending
/// discovered object walks to `out`. `visited` guards against cyclic
/// object invocation (spec §9 Design Notes) by tracking the `(y, d, t)` of
/// every object definition already walked in this `decode()` call.
pub fn find_objects(
    invoc: &InvocationResult,
    page: &PacketMap,
    level: Level,
    parent_type: u8,
    visited: &mut HashSet<(u8, u8, u8)>,
    out: &mut ObjectInvocations,
) {
    for &(org_r, org_c, it_address, it_mode, it_data) in &invoc.invokes {
        // Scope test: an active object may invoke adaptive/passive, an
        // adaptive may invoke passive, never upward. Mirrors the source
        // exactly (see SPEC_FULL.md for why this comparison in practice
        // never actually filters anything, given `parent_type` is always
        // 0, 1 or 2).
        if (it_mode & 0x10) <= parent_type {
            continue;
        }

        // Locality test: only Local Objects are supported (no POP/GPOP).
        if (it_address & 0x18) != 0x08 {
            continue;
        }

        let obj_def_y = 26u8;
        let obj_def_d = ((it_address & 1) << 3) | (it_data >> 4);
        let obj_def_t = it_data & 0x0f;

        if !visited.insert((obj_def_y, obj_def_d, obj_def_t)) {
            continue;
        }

        let Some(packet) = page.enhancement(obj_def_y, obj_def_d) else {
            continue;
        };
        let Some(raw) = packet[obj_def_t as usize] else {
            continue;
        };

        let ot = split(raw);
        let level_filter = if level.is_3p5() { 0x10 } else { 0x08 };

        let matches = it_data == ot.data
            && (it_address & 0x03) == (ot.address & 0x03)
            && (it_mode | 0x04) == ot.mode
            && (ot.address & level_filter) != 0;

        if !matches {
            continue;
        }

        match it_mode {
            0x11 => {
                let obj = walk::<Level2p5>(page, obj_def_y, obj_def_d, obj_def_t, org_r, org_c);
                out.active.push(obj.clone());
                find_objects(&obj, page, level, ACTIVE, visited, out);
            }
            0x12 => {
                let obj = walk::<Level2p5>(page, obj_def_y, obj_def_d, obj_def_t, org_r, org_c);
                out.adaptive.push(obj.clone());
                find_objects(&obj, page, level, ADAPTIVE, visited, out);
            }
            0x13 => {
                let obj = walk::<Level2p5>(page, obj_def_y, obj_def_d, obj_def_t, org_r, org_c);
                out.passive.push(obj);
            }
            _ => {}
        }
    }
}

/// Resolve the root (local) invocation at the page's top level.
pub fn find_objects_root(
    invoc: &InvocationResult,
    page: &PacketMap,
    level: Level,
) -> ObjectInvocations {
    let mut visited = HashSet::new();
    let mut out = ObjectInvocations::default();
    find_objects(invoc, page, level, ROOT, &mut visited, &mut out);
    out
}
