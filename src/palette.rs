//! Palette & Presentation (spec §4.4, Level ≥ 2.5): the default CLUT, the
//! X/28/0 and X/28/4 presentation triplets, and the eight-entry CLUT remap
//! table used to offset the starting foreground/background colour.

use crate::level::Level;
use crate::packet::PacketMap;

/// The 32-entry default CLUT, each entry 12-bit RGB (4 bits per channel).
pub const DEFAULT_PALETTE: [u16; 32] = [
    0x000, 0xf00, 0x0f0, 0xff0, 0x00f, 0xf0f, 0x0ff, 0xfff, 0x000, 0x700, 0x070, 0x770, 0x007,
    0x707, 0x077, 0x777, 0xf05, 0xf70, 0x0f7, 0xffb, 0x0ca, 0x500, 0x652, 0xc77, 0x333, 0xf77,
    0x7f7, 0xff7, 0x77f, 0xf7f, 0x7ff, 0xddd,
];

/// Expand the 12-bit CLUT to 24-bit RGB (8 bits per channel, nibble
/// replicated), flattened `[r, g, b, r, g, b, ...]` for all 32 entries.
pub fn to_rgb888(palette: &[u16; 32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(32 * 3);
    for &entry in palette {
        let r = ((entry & 0xf00) >> 8) as u8;
        let g = ((entry & 0x0f0) >> 4) as u8;
        let b = (entry & 0x00f) as u8;
        out.push((r << 4) | r);
        out.push((g << 4) | g);
        out.push((b << 4) | b);
    }
    out
}

/// Foreground/background CLUT offsets selected by the 3-bit CLUT remap
/// code in X/28/12.
pub struct ClutRemap {
    pub foreground_map: u8,
    pub background_map: u8,
}

pub fn clut_remap(code: u8) -> ClutRemap {
    let (foreground_map, background_map) = match code {
        0 => (0, 0),
        1 => (0, 8),
        2 => (0, 16),
        3 => (8, 8),
        4 => (8, 16),
        5 => (16, 8),
        6 => (16, 16),
        7 => (16, 24),
        _ => (0, 0),
    };
    ClutRemap {
        foreground_map,
        background_map,
    }
}

/// Page-wide presentation state parsed from X/28/0 and X/28/4.
#[derive(Debug, Clone)]
pub struct Presentation {
    pub default_region: u8,
    pub default_nos: u8,
    pub second_region: u8,
    pub second_nos: u8,
    pub full_screen: u8,
    pub full_row_down: u8,
    pub bbcs: bool,
    pub foreground_map: u8,
    pub background_map: u8,
    pub left_side_panel: u8,
    pub right_side_panel: u8,
    pub start_foreground: u8,
}

impl Presentation {
    fn defaults(default_region: u8, default_nos: u8) -> Self {
        Self {
            default_region,
            default_nos,
            second_region: 0xf,
            second_nos: 0x7,
            full_screen: 0,
            full_row_down: 0,
            bbcs: false,
            foreground_map: 0,
            background_map: 0,
            left_side_panel: 0,
            right_side_panel: 0,
            start_foreground: 7,
        }
    }
}

/// Parse presentation control data from X/28/0 (and, at Level 3.5, X/28/4)
/// and fill the palette from the same packets. `default_region`/
/// `default_nos` are the page-level defaults computed from the page header
/// and control bits (spec §4.1); they may be overridden by X/28/0.
pub fn parse(
    page: &PacketMap,
    level: Level,
    default_region: u8,
    default_nos: u8,
    palette: &mut [u16; 32],
) -> Presentation {
    let mut presentation = Presentation::defaults(default_region, default_nos);

    if !level.at_least_2p5() {
        return presentation;
    }

    let pres_des: Option<u8> = if page.enhancement(28, 0).is_some() {
        Some(0)
    } else if level.is_3p5() && page.enhancement(28, 4).is_some() {
        Some(4)
    } else {
        None
    };

    let mut clut_remap_code = 0u8;

    if let Some(pres_des) = pres_des {
        let pres = page.enhancement(28, pres_des).unwrap();

        if let Some(t0) = pres[0] {
            presentation.default_region = ((t0 >> 10) & 0xf) as u8;
            presentation.default_nos = ((t0 >> 7) & 0x7) as u8;
            presentation.second_region = (t0 >> 14) as u8;
        }

        if let Some(t1) = pres[1] {
            presentation.second_nos = (t1 & 0x7) as u8;
        }

        if let Some(t12) = pres[12] {
            presentation.full_screen = ((t12 >> 4) & 0x1f) as u8;
            presentation.full_row_down = ((t12 >> 9) & 0x1f) as u8;
            presentation.bbcs = (t12 & 0x4000) == 0x4000;
            clut_remap_code = (t12 >> 15) as u8;
        }

        let remap = clut_remap(clut_remap_code);
        presentation.foreground_map = remap.foreground_map;
        presentation.background_map = remap.background_map;
        presentation.start_foreground = presentation.foreground_map | 7;

        if let Some(t1) = pres[1] {
            if level.is_3p5() || (t1 & 0x20) == 0x20 {
                let side_panel_cols = ((t1 >> 6) & 0xf) as u8;
                if (t1 & 0x8) == 0x8 {
                    presentation.left_side_panel = if side_panel_cols == 0 {
                        16
                    } else {
                        side_panel_cols
                    };
                }
                if (t1 & 0x10) == 0x10 {
                    presentation.right_side_panel = 16 - side_panel_cols;
                }
            }
        }

        for d in [0u8, 4] {
            if d == 4 && !level.is_3p5() {
                continue;
            }
            let Some(pres) = page.enhancement(28, d) else {
                continue;
            };

            let mut c = if d == 0 { 16 } else { 0 };
            let c_end = c + 15;
            let mut t = 1usize;

            loop {
                if let (Some(p_t), Some(p_t1)) = (pres[t], pres.get(t + 1).copied().flatten()) {
                    palette[c as usize] =
                        (((p_t >> 2) & 0xf00) | ((p_t >> 10) & 0x0f0) | (p_t1 & 0x00f)) as u16;
                }

                if c == c_end {
                    break;
                }

                if let (Some(p_t1), Some(p_t2)) = (
                    pres.get(t + 1).copied().flatten(),
                    pres.get(t + 2).copied().flatten(),
                ) {
                    palette[(c + 1) as usize] = (((p_t1 << 4) & 0xf00)
                        | ((p_t1 >> 4) & 0x0f0)
                        | ((p_t1 >> 12) & 0x00f)) as u16;
                    palette[(c + 2) as usize] = (((p_t1 >> 8) & 0x300)
                        | ((p_t2 << 10) & 0xc00)
                        | ((p_t2 << 2) & 0x0f0)
                        | ((p_t2 >> 6) & 0x00f)) as u16;
                }

                c += 3;
                t += 2;
            }
        }
    }

    presentation
}
