use std::fs::File;
use std::io::BufReader;

use anyhow::{anyhow, Result};
use serde::Serialize;

use teletext_decoder::reader::tti::TtiReader;
use teletext_decoder::reader::PacketSource;
use teletext_decoder::Decoder;

use crate::{Args, DecodeArgs, Format};

#[derive(Serialize)]
struct CellDump {
    code: char,
    set: u8,
    diacritic: u8,
    foreground: u8,
    background: u8,
    flash_mode: u8,
    flash_rate_phase: u8,
    flash_phase_shown: u8,
    conceal: bool,
    invert: bool,
    und_sep: bool,
    fragment: String,
}

#[derive(Serialize)]
struct PageDump {
    full_screen: u8,
    full_row: Vec<u8>,
    flash_present: u8,
    left_side_panel: u8,
    right_side_panel: u8,
    palette_rgb888: Vec<u8>,
    cells: Vec<Vec<CellDump>>,
}

pub fn decode_cmd(args: &Args, decode_args: &DecodeArgs) -> Result<()> {
    let mut input = BufReader::new(File::open(&args.input)?);
    let pages = TtiReader::new().read(&mut input)?;

    if pages.is_empty() {
        return Err(anyhow!("{:?} contains no subpages", args.input));
    }

    let page_index = if decode_args.subpage > pages.len() {
        eprintln!(
            "warning: selected subpage {} not found in input file, using the last subpage",
            decode_args.subpage
        );
        pages.len() - 1
    } else {
        decode_args.subpage.saturating_sub(1)
    };

    let mut decoder = Decoder::new();
    decoder.decode(
        &pages[page_index],
        decode_args.level,
        !decode_args.classic,
        !decode_args.classic,
    );

    match decode_args.format {
        Format::Text => print_text(&decoder),
        Format::Json => print_json(&decoder)?,
    }

    Ok(())
}

fn print_text(decoder: &Decoder) {
    for r in 0..25u8 {
        let mut line = String::with_capacity(40);
        for c in 0..40u8 {
            line.push(decoder.get_char_code(r, c));
        }
        println!("{line}");
    }
}

fn print_json(decoder: &Decoder) -> Result<()> {
    let mut cells = Vec::with_capacity(25);
    for r in 0..25u8 {
        let mut row = Vec::with_capacity(72);
        for c in 0..72u8 {
            row.push(CellDump {
                code: decoder.get_char_code(r, c),
                set: decoder.get_char_set(r, c),
                diacritic: decoder.get_char_diacritic(r, c),
                foreground: decoder.get_foreground(r, c),
                background: decoder.get_background(r, c),
                flash_mode: decoder.get_flash_mode(r, c),
                flash_rate_phase: decoder.get_flash_rate_phase(r, c),
                flash_phase_shown: decoder.get_flash_phase_shown(r, c),
                conceal: decoder.get_conceal(r, c),
                invert: decoder.get_invert(r, c),
                und_sep: decoder.get_und_sep(r, c),
                fragment: format!("{:?}", decoder.get_fragment(r, c)),
            });
        }
        cells.push(row);
    }

    let dump = PageDump {
        full_screen: decoder.get_full_screen(),
        full_row: (0..25u8).map(|r| decoder.get_full_row(r)).collect(),
        flash_present: decoder.get_flash_present(),
        left_side_panel: decoder.get_left_side_panel(),
        right_side_panel: decoder.get_right_side_panel(),
        palette_rgb888: decoder.get_palette(),
        cells,
    };

    serde_json::to_writer_pretty(std::io::stdout(), &dump)?;
    println!();
    Ok(())
}
