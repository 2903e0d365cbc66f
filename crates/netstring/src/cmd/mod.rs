use clap::{Args, Subcommand};
use std::path::PathBuf;

use netstring_frame::DEFAULT_QUEUE_CAPACITY;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode one payload as a frame on stdout.
    Encode(EncodeArgs),
    /// Decode a frame stream and print each message.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

impl Command {
    /// Whether per-byte parse tracing was requested.
    pub fn verbose(&self) -> bool {
        matches!(self, Command::Decode(args) if args.verbose)
    }
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Raw string payload (the text segment when --binary is given).
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,
    /// Read payload from file. Stdin is used when neither --data nor --file is given.
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,
    /// Append the contents of this file as the binary segment of a mixed frame.
    #[arg(long, value_name = "FILE")]
    pub binary: Option<PathBuf>,
    /// Frame terminator (a single ASCII character).
    #[arg(long, default_value = ",", value_parser = parse_symbol)]
    pub end_symbol: u8,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Read frames from file instead of stdin.
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Frame terminator (a single ASCII character).
    #[arg(long, default_value = ",", value_parser = parse_symbol)]
    pub end_symbol: u8,
    /// Maximum bytes fed to the decoder per read.
    #[arg(long, default_value_t = 8192)]
    pub chunk_size: usize,
    /// Capacity of each output queue.
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,
    /// Skip frames declaring more payload bytes than this.
    #[arg(long, value_name = "BYTES")]
    pub max_payload: Option<usize>,
    /// Log every parse decision (implies --log-level trace).
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse a delimiter argument: exactly one ASCII character.
pub fn parse_symbol(input: &str) -> Result<u8, String> {
    match input.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(format!(
            "expected a single ASCII character, got {input:?}"
        )),
    }
}
