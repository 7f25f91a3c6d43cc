use std::fs::File;
use std::io::BufReader;

use anyhow::{anyhow, Result};

use teletext_decoder::reader::tti::TtiReader;
use teletext_decoder::reader::PacketSource;

use crate::Args;

pub fn dump_packets_cmd(args: &Args) -> Result<()> {
    let mut input = BufReader::new(File::open(&args.input)?);
    let pages = TtiReader::new().read(&mut input)?;

    if pages.is_empty() {
        return Err(anyhow!("{:?} contains no subpages", args.input));
    }

    for (i, page) in pages.iter().enumerate() {
        println!("subpage {}:", i + 1);
        println!("  region: {}", page.region);

        let mut control_bits: Vec<&u8> = page.control_bits.iter().collect();
        control_bits.sort();
        println!("  control_bits: {control_bits:?}");

        let rows: Vec<u8> = (0..=24u8).filter(|&r| page.has_row(r)).collect();
        println!("  rows present: {rows:?}");

        for y in 26..=29u8 {
            for d in 0..16u8 {
                if let Some(packet) = page.enhancement(y, d) {
                    let decodable = packet.iter().filter(|t| t.is_some()).count();
                    println!("  enhancement ({y},{d}): {decodable}/13 triplets decodable");
                }
            }
        }
    }

    Ok(())
}
