//! Overlay Engine (spec §4.6, Level ≥ 2.5): applies resolved Adaptive and
//! Passive object walks onto the cell grid the Grid Builder already
//! produced for the page's own rows.

use std::collections::{HashMap, HashSet};

use crate::cell::{Attribute, Cell, Fragment};
use crate::enhance::{enlarge_char, parse_attr_enhancements, parse_char_enhancements};
use crate::invocation::InvocationResult;

/// Overlay every Adaptive object's enhancements onto `cells`. An Adaptive
/// object only replaces parts of the underlying single-size character it
/// overlays, unless it also changes the display attributes (mode 0x2c),
/// in which case it may overlap any part of any size character (spec §4.6
/// step 2).
pub fn apply_adaptive(cells: &mut [[Cell; 72]; 25], adp_invoc: &[InvocationResult], g2_default_char_set: u8) {
    for invocation in adp_invoc {
        let mut col_left: HashMap<u8, u8> = HashMap::new();
        let mut col_right: HashMap<u8, u8> = HashMap::new();
        for &(r, c) in invocation.enhancements.keys() {
            col_left
                .entry(r)
                .and_modify(|min_c| *min_c = (*min_c).min(c))
                .or_insert(c);
            col_right
                .entry(r)
                .and_modify(|max_c| *max_c = (*max_c).max(c))
                .or_insert(c);
        }

        let mut covered: HashSet<(u8, u8)> = HashSet::new();

        for (&r, &c_left) in &col_left {
            let c_right = col_right[&r];
            let mut adp_attr = Attribute::default();
            let mut changes: HashSet<u8> = HashSet::new();

            for c in c_left..=c_right {
                let mut x26_character = None;
                if let Some(list) = invocation.enhancements.get(&(r, c)) {
                    changes.extend(parse_attr_enhancements(list, &mut adp_attr));
                    x26_character = parse_char_enhancements(list);
                }

                let (ri, ci) = (r as usize, c as usize);

                if changes.contains(&0x2c) {
                    cells[ri][ci].attr.display = adp_attr.display;
                    if !covered.contains(&(r, c)) {
                        enlarge_char(cells, r, c, &mut covered);
                    }
                } else if cells[ri][ci].fragment == Fragment::DwRight
                    || cells[ri][ci].fragment == Fragment::DsTopRight
                {
                    covered.insert((r, c));
                }

                if !covered.contains(&(r, c)) {
                    let mut any_change = false;
                    if changes.contains(&0x20) {
                        cells[ri][ci].attr.foreground = adp_attr.foreground;
                        any_change = true;
                    }
                    if changes.contains(&0x23) {
                        cells[ri][ci].attr.background = adp_attr.background;
                        any_change = true;
                    }
                    if changes.contains(&0x27) {
                        cells[ri][ci].attr.flash = adp_attr.flash;
                        any_change = true;
                    }
                    if any_change {
                        enlarge_char(cells, r, c, &mut covered);
                    }
                }

                if let Some((ch_code, ch_set_raw, ch_diacritic)) = x26_character {
                    if !covered.contains(&(r, c)) {
                        let ch_set = match ch_set_raw {
                            2 => g2_default_char_set,
                            24 if adp_attr.display.und_sep => 25,
                            other => other,
                        };
                        cells[ri][ci].ch.code = ch_code;
                        cells[ri][ci].ch.set = ch_set;
                        // Source resolves the "no diacritic" case to a
                        // no-op assignment (a typo on an unrelated field);
                        // the evident intent is to clear any stale
                        // diacritic, so that's what this does.
                        cells[ri][ci].ch.diacritic = ch_diacritic.unwrap_or(0);
                        enlarge_char(cells, r, c, &mut covered);
                    }
                }
            }
        }
    }
}

/// Overlay every Passive object's enhancements onto `cells`. A Passive
/// object always starts from default attributes and applies its triplets
/// cumulatively, in the order they were encountered during the invocation
/// walk (spec §4.6 step 3) — `cell_order` carries that order since a
/// `HashMap`'s own iteration order is unspecified.
pub fn apply_passive(cells: &mut [[Cell; 72]; 25], pas_invoc: &[InvocationResult], g2_default_char_set: u8) {
    for invocation in pas_invoc {
        let mut covered: HashSet<(u8, u8)> = HashSet::new();
        let mut pas_attr = Attribute::default();

        for &(r, c) in &invocation.cell_order {
            let Some(list) = invocation.enhancements.get(&(r, c)) else {
                continue;
            };
            parse_attr_enhancements(list, &mut pas_attr);
            let x26_character = parse_char_enhancements(list);

            if let Some((ch_code, ch_set_raw, ch_diacritic)) = x26_character {
                if !covered.contains(&(r, c)) {
                    let ch_set = match ch_set_raw {
                        2 => g2_default_char_set,
                        24 if pas_attr.display.und_sep => 25,
                        other => other,
                    };
                    let (ri, ci) = (r as usize, c as usize);
                    cells[ri][ci].attr = pas_attr;
                    cells[ri][ci].ch.code = ch_code;
                    cells[ri][ci].ch.set = ch_set;
                    cells[ri][ci].ch.diacritic = ch_diacritic.unwrap_or(0);
                    enlarge_char(cells, r, c, &mut covered);
                }
            }
        }
    }
}
