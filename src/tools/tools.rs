mod decode;
use decode::decode_cmd;
mod dump_packets;
use dump_packets::dump_packets_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use teletext_decoder::Level;

/// Decode and inspect teletext pages
#[derive(Clone, Debug, Parser)]
struct Args {
    /// input .tti/.ttix filename to parse
    #[arg(short, long)]
    input: PathBuf,
    #[command(subcommand)]
    operation: Operation,
}

#[derive(Clone, Debug, Subcommand)]
enum Operation {
    /// Decode a subpage and print a text or JSON rendering of the grid
    Decode(DecodeArgs),
    /// Dump the raw packet map (rows present, enhancement triplets present)
    DumpPackets,
}

#[derive(Clone, Debug, Parser)]
struct DecodeArgs {
    /// 1-based subpage index within the input file
    #[arg(short, long, default_value_t = 1)]
    subpage: usize,
    /// decoding level: one of 1, 1.5, 2.5, 3.5
    #[arg(short, long, default_value = "2.5", value_parser = parse_level)]
    level: Level,
    /// disable black foreground and double width/size (below Level 2.5)
    #[arg(short, long)]
    classic: bool,
    /// output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,
}

/// Output format for the `decode` subcommand
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn parse_level(s: &str) -> Result<Level, String> {
    Level::parse(s)
        .ok_or_else(|| format!("invalid decoding level {s:?}, expected one of 1, 1.5, 2.5, 3.5"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    match &args.operation {
        Operation::Decode(decode_args) => decode_cmd(&args, decode_args),
        Operation::DumpPackets => dump_packets_cmd(&args),
    }
}
