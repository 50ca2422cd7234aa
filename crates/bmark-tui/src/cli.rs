//! CLI argument parsing for the bmark palette.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "bmark")]
#[command(about = "Bookmark command palette - Ctrl+K to open, Esc to close", version)]
pub struct Cli {
    /// Custom daemon socket path (defaults to `$XDG_RUNTIME_DIR/bmark.sock`)
    #[arg(long, value_name = "PATH")]
    pub socket_path: Option<PathBuf>,

    /// Enable debug logging (logs to /tmp/bmark-tui.log)
    #[arg(short, long)]
    pub debug: bool,
}
