//! Grid Builder (spec §4.5): the per-row, per-column pass that merges
//! Level 1 spacing attributes, X/26 local enhancements and active-object
//! overlays into the 25×72 cell grid, including enlargement propagation
//! and flash-phase bookkeeping.

use crate::cell::{Attribute, Cell, Fragment};
use crate::charset;
use crate::enhance::{enlarge_char, parse_attr_enhancements, parse_char_enhancements, parse_g0g2_enhancements};
use crate::invocation::InvocationResult;
use crate::level::Level;
use crate::packet::PacketMap;
use crate::palette::Presentation;

/// Page-wide state produced alongside the cell grid, feeding the Overlay
/// Engine and the public accessors (spec §4.7).
pub struct GridOutput {
    pub full_row: [u8; 25],
    pub flash_present: u8,
    pub full_screen: u8,
    pub g2_default_char_set: u8,
}

/// Gather the enhancements recorded for `(r, c)` across the page's Active
/// object overlays and its root local enhancement, in that order (later
/// entries override earlier ones in the per-mode parsers).
fn enhances_at(
    act_invoc: &[InvocationResult],
    local_enh: Option<&InvocationResult>,
    r: u8,
    c: u8,
) -> Vec<(u8, u8)> {
    let mut out = Vec::new();
    for inv in act_invoc {
        if let Some(list) = inv.enhancements.get(&(r, c)) {
            out.extend(list.iter().copied());
        }
    }
    if let Some(local) = local_enh {
        if let Some(list) = local.enhancements.get(&(r, c)) {
            out.extend(list.iter().copied());
        }
    }
    out
}

#[allow(clippy::too_many_arguments)]
pub fn build(
    page: &PacketMap,
    level: Level,
    allow_black_foreground: bool,
    allow_double_width: bool,
    presentation: &Presentation,
    act_invoc: &[InvocationResult],
    local_enh: Option<&InvocationResult>,
    cells: &mut [[Cell; 72]; 25],
) -> GridOutput {
    let mut start_attr = Attribute {
        foreground: presentation.start_foreground,
        ..Attribute::default()
    };

    let mut full_screen = presentation.full_screen;
    let mut full_row_down = presentation.full_row_down;
    let bbcs = presentation.bbcs;

    let l1_default_char_set = charset::l1_char_set(presentation.default_region, presentation.default_nos);
    let l1_second_char_set = charset::l1_char_set_raw(presentation.second_region, presentation.second_nos)
        .unwrap_or(l1_default_char_set);
    let g0_default_char_set = charset::g0_char_set(presentation.default_region, presentation.default_nos);
    let g2_default_char_set = charset::g2_char_set(presentation.default_region, presentation.default_nos);

    let mut second_g0g2: Option<(u8, u8)> = None;

    let mut l1_dheight_found = false;
    let mut l1_bottom_half = false;
    let mut flash_present = 0u8;
    let mut full_row = [0u8; 25];
    let mut flash_origin_c: u8 = 0;

    for r in 0u8..25 {
        let pkt = page.row(r);

        full_row[r as usize] = full_row_down;
        start_attr.background = if bbcs { full_row_down } else { presentation.background_map };

        let mut current_attr = start_attr;

        let mut l1_fground_col: u8 = 7;
        let mut l1_mosaics = false;
        let mut l1_sep_mosaics = false;
        let mut l1_hold_mosaics = false;
        let mut l1_hold_mosaic_ch: u8 = 0x20;
        let mut l1_hold_mosaic_sep = false;
        let mut l1_escape_switch = false;

        let mut l1_char_set = l1_default_char_set;
        let mut g0_char_set = g0_default_char_set;
        let mut g2_char_set = g2_default_char_set;

        for c in 0u8..72 {
            let enhances = enhances_at(act_invoc, local_enh, r, c);

            if c == 0 {
                for &(mode, data) in &enhances {
                    if mode == 0x00 && (data & 0x60) == 0x00 {
                        full_screen = data;
                        full_row_down = data;
                        full_row[r as usize] = data;
                        if bbcs {
                            start_attr.background = data;
                        }
                    } else if mode == 0x01 || (mode == 0x07 && r == 0) {
                        full_row[r as usize] = data & 0x1f;
                        if bbcs {
                            start_attr.background = data & 0x1f;
                        }
                        if (data & 0x60) == 0x60 {
                            full_row_down = data & 0x1f;
                        }
                    }
                }
            }

            if c == 0 {
                current_attr = start_attr;
            } else if c == 40 || c == 56 {
                current_attr = start_attr;
                current_attr.background = full_row[r as usize];
            }

            let l1_byte = if c < 40 && page.has_row(r) {
                pkt[c as usize]
            } else {
                0x20
            };

            if c < 40 && !l1_bottom_half {
                match l1_byte {
                    0x09 => {
                        current_attr.flash.mode = 0;
                        current_attr.flash.rate_phase = 0;
                    }
                    0x0a if c > 0 && pkt[c as usize - 1] == 0x0a => {
                        current_attr.display.box_win = false;
                    }
                    0x0b if c > 0 && pkt[c as usize - 1] == 0x0b => {
                        current_attr.display.box_win = true;
                    }
                    0x0c => {
                        if current_attr.display.dheight || current_attr.display.dwidth {
                            l1_hold_mosaic_ch = 0x20;
                            l1_hold_mosaic_sep = false;
                        }
                        current_attr.display.dheight = false;
                        current_attr.display.dwidth = false;
                    }
                    0x18 => current_attr.display.conceal = true,
                    0x19 => {
                        if !current_attr.display.und_sep {
                            l1_sep_mosaics = false;
                        }
                    }
                    0x1a => l1_sep_mosaics = true,
                    0x1c => current_attr.background = start_attr.background,
                    0x1d => current_attr.background = l1_fground_col | presentation.background_map,
                    0x1e => l1_hold_mosaics = true,
                    _ => {}
                }
            }

            let changes = parse_attr_enhancements(&enhances, &mut current_attr);
            if changes.contains(&0x2c) && !current_attr.display.und_sep {
                l1_sep_mosaics = false;
            }

            if let Some((change_region, change_nos)) = parse_g0g2_enhancements(&enhances) {
                let mut new: Option<(u8, u8)> = None;
                if level.is_3p5()
                    || (change_region == presentation.default_region && change_nos == presentation.default_nos)
                    || (change_region == presentation.second_region && change_nos == presentation.second_nos)
                {
                    new = Some((change_region, change_nos));
                } else if second_g0g2.is_none() {
                    new = Some((change_region, change_nos));
                    second_g0g2 = new;
                }
                if let Some((nr, nn)) = new {
                    g0_char_set = charset::g0_char_set(nr, nn);
                    g2_char_set = charset::g2_char_set(nr, nn);
                }
            }

            if c < 40 && !l1_bottom_half {
                cells[r as usize][c as usize].ch.diacritic = 0;
                if l1_byte >= 0x20 {
                    cells[r as usize][c as usize].ch.code = l1_byte;
                    if l1_mosaics && (l1_byte & 0x20) == 0x20 {
                        cells[r as usize][c as usize].ch.set =
                            24 + u8::from(l1_sep_mosaics || current_attr.display.und_sep);
                        l1_hold_mosaic_ch = l1_byte;
                        l1_hold_mosaic_sep = l1_sep_mosaics;
                    } else {
                        cells[r as usize][c as usize].ch.set = l1_char_set;
                    }
                } else if l1_hold_mosaics {
                    cells[r as usize][c as usize].ch.code = l1_hold_mosaic_ch;
                    cells[r as usize][c as usize].ch.set = 24 + u8::from(l1_hold_mosaic_sep);
                    cells[r as usize][c as usize].ch.diacritic = 0;
                } else {
                    cells[r as usize][c as usize].ch.code = 0x20;
                    cells[r as usize][c as usize].ch.set = 0;
                    cells[r as usize][c as usize].ch.diacritic = 0;
                }
            } else {
                cells[r as usize][c as usize].ch.code = 0x20;
                cells[r as usize][c as usize].ch.set = 0;
                cells[r as usize][c as usize].ch.diacritic = 0;
            }

            let x26_character = parse_char_enhancements(&enhances);
            if let Some((ch_code, ch_set_raw, ch_diacritic)) = x26_character {
                let ch_set = match ch_set_raw {
                    0 => g0_char_set,
                    2 => g2_char_set,
                    24 if current_attr.display.und_sep => 25,
                    other => other,
                };
                cells[r as usize][c as usize].ch.code = ch_code;
                cells[r as usize][c as usize].ch.set = ch_set;
                if let Some(d) = ch_diacritic {
                    cells[r as usize][c as usize].ch.diacritic = d;
                }
            }

            let mut covered = false;

            if c > 0 {
                let left = cells[r as usize][c as usize - 1];
                if left.fragment == Fragment::DwLeft {
                    cells[r as usize][c as usize] = left;
                    cells[r as usize][c as usize].fragment = Fragment::DwRight;
                    covered = true;
                } else if left.fragment == Fragment::DsTopLeft {
                    cells[r as usize][c as usize] = left;
                    cells[r as usize][c as usize].fragment = Fragment::DsTopRight;
                    covered = true;
                }
            }

            if !covered && r > 0 {
                let prev_dheight = cells[r as usize][c as usize].attr.display.dheight;
                let prev_dwidth = cells[r as usize][c as usize].attr.display.dwidth;
                let above = cells[r as usize - 1][c as usize];

                if above.fragment == Fragment::DhTop {
                    cells[r as usize][c as usize] = above;
                    cells[r as usize][c as usize].fragment = Fragment::DhBottom;
                    covered = true;
                } else if above.fragment == Fragment::DsTopLeft {
                    cells[r as usize][c as usize] = above;
                    cells[r as usize][c as usize].fragment = Fragment::DsBottomLeft;
                    covered = true;
                } else if above.fragment == Fragment::DsTopRight {
                    cells[r as usize][c as usize] = above;
                    cells[r as usize][c as usize].fragment = Fragment::DsBottomRight;
                    covered = true;
                }

                if covered {
                    cells[r as usize][c as usize].attr.display.dheight = prev_dheight;
                    cells[r as usize][c as usize].attr.display.dwidth = prev_dwidth;
                }
            }

            if !covered && l1_bottom_half && x26_character.is_none() {
                cells[r as usize][c as usize] = cells[r as usize - 1][c as usize];
                cells[r as usize][c as usize].fragment = Fragment::Normal;
                cells[r as usize][c as usize].attr.display.dheight = false;
                cells[r as usize][c as usize].attr.display.dwidth = false;
                cells[r as usize][c as usize].ch.code = 0x20;
                cells[r as usize][c as usize].ch.set = 0;
                cells[r as usize][c as usize].ch.diacritic = 0;
                covered = true;
            }

            if current_attr.flash.mode != 0 {
                if current_attr.flash.rate_phase == 4 || current_attr.flash.rate_phase == 5 {
                    if current_attr.flash.phase_shown == 0 {
                        flash_origin_c = c;
                    }
                    current_attr.flash.phase_shown = if current_attr.flash.rate_phase == 4 {
                        ((c.wrapping_sub(flash_origin_c)) % 3) + 1
                    } else {
                        3 - ((c + 2).wrapping_sub(flash_origin_c) % 3)
                    };
                }

                if current_attr.flash.rate_phase == 0 {
                    flash_present |= 1;
                } else if current_attr.flash.rate_phase <= 5 {
                    flash_present |= 2;
                }
            }

            if !covered {
                cells[r as usize][c as usize].attr = current_attr;
                if current_attr.display.dheight {
                    cells[r as usize][c as usize].fragment = if current_attr.display.dwidth {
                        Fragment::DsTopLeft
                    } else {
                        Fragment::DhTop
                    };
                } else if current_attr.display.dwidth {
                    cells[r as usize][c as usize].fragment = Fragment::DwLeft;
                }
            }

            if c < 40 && !l1_bottom_half {
                if (l1_byte == 0x00 && allow_black_foreground) || (1..=7).contains(&l1_byte) {
                    l1_mosaics = false;
                    l1_fground_col = l1_byte;
                    current_attr.foreground = l1_fground_col | presentation.foreground_map;
                    current_attr.display.conceal = false;
                    l1_hold_mosaic_ch = 0x20;
                    l1_hold_mosaic_sep = false;
                } else if (l1_byte == 0x10 && allow_black_foreground) || (0x11..=0x17).contains(&l1_byte) {
                    l1_mosaics = true;
                    l1_fground_col = l1_byte & 0x07;
                    current_attr.foreground = l1_fground_col | presentation.foreground_map;
                    current_attr.display.conceal = false;
                } else if l1_byte == 0x08 {
                    current_attr.flash.mode = 1;
                    current_attr.flash.rate_phase = 0;
                } else if l1_byte == 0x0d {
                    if !current_attr.display.dheight || current_attr.display.dwidth {
                        l1_hold_mosaic_ch = 0x20;
                        l1_hold_mosaic_sep = false;
                    }
                    current_attr.display.dheight = true;
                    current_attr.display.dwidth = false;
                    l1_dheight_found = true;
                } else if l1_byte == 0x0e && allow_double_width {
                    if current_attr.display.dheight || !current_attr.display.dwidth {
                        l1_hold_mosaic_ch = 0x20;
                        l1_hold_mosaic_sep = false;
                    }
                    current_attr.display.dheight = false;
                    current_attr.display.dwidth = true;
                } else if l1_byte == 0x0f && allow_double_width {
                    if !current_attr.display.dheight || !current_attr.display.dwidth {
                        l1_hold_mosaic_ch = 0x20;
                        l1_hold_mosaic_sep = false;
                    }
                    current_attr.display.dheight = true;
                    current_attr.display.dwidth = true;
                    l1_dheight_found = true;
                } else if l1_byte == 0x1b {
                    l1_escape_switch = !l1_escape_switch;
                    l1_char_set = if l1_escape_switch {
                        l1_second_char_set
                    } else {
                        l1_default_char_set
                    };
                } else if l1_byte == 0x1f {
                    l1_hold_mosaics = false;
                }
            }
        }

        if l1_bottom_half {
            l1_bottom_half = false;
        }
        if l1_dheight_found {
            l1_bottom_half = true;
            l1_dheight_found = false;
        }
    }

    GridOutput {
        full_row,
        flash_present,
        full_screen,
        g2_default_char_set,
    }
}
