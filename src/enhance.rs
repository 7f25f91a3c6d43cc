//! X/26 enhancement triplet interpretation shared by the Grid Builder and
//! the Overlay Engine (spec §4.5/§4.6): turning an ordered `(mode, data)`
//! list for one cell into character and attribute changes, and the
//! enlargement-fragment propagation both passes rely on.

use std::collections::HashSet;

use crate::cell::{Attribute, Cell, Fragment};

/// `(code, set, diacritic)` decoded from the last matching character
/// triplet in `enhances` (later triplets win, per spec §4.5 step 4).
pub type CharEnhancement = (u8, u8, Option<u8>);

/// Bitmask-free "which attribute modes changed" marker set, keyed by the
/// raw X/26 mode value (0x20 foreground, 0x23 background, 0x27 flash,
/// 0x2c display attributes).
pub type AttrChanges = HashSet<u8>;

pub fn parse_char_enhancements(enhances: &[(u8, u8)]) -> Option<CharEnhancement> {
    let mut result = None;

    for &(mode, data) in enhances {
        if data < 0x20 {
            continue;
        }
        result = match mode {
            0x21 => Some((data, 24, None)),       // G1 character
            0x22 | 0x2b => Some((data, 26, None)), // G3 character
            0x29 => Some((data, 0, None)),         // G0 character
            0x2f => Some((data, 2, None)),         // G2 character
            m if m >= 0x30 => Some((data, 0, Some(m - 0x30))), // G0 diacritic
            _ => result,
        };
    }

    result
}

pub fn parse_attr_enhancements(enhances: &[(u8, u8)], attr: &mut Attribute) -> AttrChanges {
    let mut changes = HashSet::new();

    for &(mode, data) in enhances {
        match mode {
            0x20 if data < 0x20 => {
                attr.foreground = data;
                changes.insert(0x20);
            }
            0x23 if data < 0x20 => {
                attr.background = data;
                changes.insert(0x23);
            }
            0x27 => {
                attr.flash.mode = data & 0x03;
                attr.flash.rate_phase = data >> 2;
                attr.flash.phase_shown = if attr.flash.rate_phase == 4 || attr.flash.rate_phase == 5
                {
                    0
                } else {
                    attr.flash.rate_phase
                };
                changes.insert(0x27);
            }
            0x2c => {
                attr.display.dheight = (data & 0x01) == 0x01;
                attr.display.box_win = (data & 0x02) == 0x02;
                attr.display.conceal = (data & 0x04) == 0x04;
                attr.display.invert = (data & 0x10) == 0x10;
                attr.display.und_sep = (data & 0x20) == 0x20;
                attr.display.dwidth = (data & 0x40) == 0x40;
                changes.insert(0x2c);
            }
            _ => {}
        }
    }

    changes
}

/// Modified G0/G2 character set designation (mode 0x28): `(region, nos)`.
pub fn parse_g0g2_enhancements(enhances: &[(u8, u8)]) -> Option<(u8, u8)> {
    for &(mode, data) in enhances {
        if mode == 0x28 {
            return Some((data >> 3, data & 0x07));
        }
    }
    None
}

/// Propagate an enlarged cell's content into the companion cell(s) implied
/// by its display attributes, marking the covered cells in `covered` so
/// later overlay passes don't double-apply to them (spec §4.5 step 8).
pub fn enlarge_char(cells: &mut [[Cell; 72]; 25], r: u8, c: u8, covered: &mut HashSet<(u8, u8)>) {
    let ri = r as usize;
    let ci = c as usize;

    let dheight = if r > 22 {
        false
    } else {
        cells[ri][ci].attr.display.dheight
    };
    let dwidth = if c == 39 {
        false
    } else {
        cells[ri][ci].attr.display.dwidth
    };

    cells[ri][ci].fragment = if dheight {
        if dwidth {
            Fragment::DsTopLeft
        } else {
            Fragment::DhTop
        }
    } else if dwidth {
        Fragment::DwLeft
    } else {
        Fragment::Normal
    };

    match cells[ri][ci].fragment {
        Fragment::DhTop => {
            cells[ri + 1][ci] = cells[ri][ci];
            cells[ri + 1][ci].fragment = Fragment::DhBottom;
            covered.insert((r + 1, c));
        }
        Fragment::DwLeft => {
            cells[ri][ci + 1] = cells[ri][ci];
            cells[ri][ci + 1].fragment = Fragment::DwRight;
            covered.insert((r, c + 1));
        }
        Fragment::DsTopLeft => {
            let origin = cells[ri][ci];
            cells[ri][ci + 1] = origin;
            cells[ri + 1][ci] = origin;
            cells[ri + 1][ci + 1] = origin;
            cells[ri][ci + 1].fragment = Fragment::DsTopRight;
            cells[ri + 1][ci].fragment = Fragment::DsBottomLeft;
            cells[ri + 1][ci + 1].fragment = Fragment::DsBottomRight;
            covered.insert((r, c + 1));
            covered.insert((r + 1, c));
            covered.insert((r + 1, c + 1));
        }
        _ => {}
    }
}
