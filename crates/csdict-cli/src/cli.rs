//! Program option definitions for the csdict client.

use clap::Parser;

/// Interactive client for DICT dictionary servers.
///
/// Commands are read from standard input at the `csdict>` prompt: `open
/// SERVER [PORT]`, `dict`, `set DICTIONARY`, `currdict`, `define WORD`,
/// `match WORD`, `prefixmatch WORD`, `close`, and `quit`.
#[derive(Parser, Debug)]
#[command(name = "csdict", version, disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Mirrors the raw protocol exchange with `-->` and `<--` markers.
    #[arg(short = 'd', long = "debug")]
    pub(crate) debug: bool,
}
