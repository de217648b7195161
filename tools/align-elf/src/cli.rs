use std::path::PathBuf;

use clap::Parser;

use crate::output::OutputFormat;

/// Rewrite the alignment of PT_LOAD segments in ELF shared objects.
///
/// Each file is patched in place; only the `p_align` field of loadable
/// segments changes.
#[derive(Parser, Debug)]
#[command(name = "align-elf", version, about)]
pub struct Cli {
    /// ELF shared objects to align.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Target segment alignment in bytes [default: 16384].
    #[arg(long)]
    pub page_size: Option<u64>,

    /// Report what would change without writing.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// TOML config file with `page_size` and `require_power_of_two`.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
