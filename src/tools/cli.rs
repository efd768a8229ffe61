//! Command line interface for the rle binary.

use clap::{Parser, Subcommand};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "A table-driven run length encoder for files",
    long_about = None)]
pub struct Cli {
    /// Suppress everything but errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Deflate a file, writing <input>.rle next to it
    Deflate {
        /// File to deflate
        input: String,
    },
    /// Inflate an .rle file, restoring the original name
    Inflate {
        /// File to inflate
        input: String,
    },
}

/// Parse the command line and bring up the terminal logger.
pub fn init() -> Cli {
    let cli = Cli::parse();

    let level = if cli.quiet {
        LevelFilter::Error
    } else {
        match cli.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stdout,
        ColorChoice::Auto,
    )
    .expect("logger initialized once");

    cli
}

/// Output name for a deflated copy of `input`.
pub fn deflated_name(input: &str) -> String {
    format!("{}.rle", input)
}

/// Output name for an inflated copy of `input`: the `.rle` suffix stripped,
/// or `.out` appended when the input is not named like a deflated file.
pub fn inflated_name(input: &str) -> String {
    match input.strip_suffix(".rle") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => format!("{}.out", input),
    }
}
