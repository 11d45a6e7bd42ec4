//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

/// Infinite ASCII canvas editor with modal navigation and live zones.
#[derive(Debug, Parser)]
#[command(name = "mygrid", version, about)]
pub struct Cli {
    /// Project (.json) or text file to open at startup.
    pub file: Option<PathBuf>,

    /// Enable the external command API (TCP and, on Unix, a FIFO).
    #[arg(long)]
    pub server: bool,

    /// Host to bind the TCP API to. Loopback unless you know better.
    #[arg(long)]
    pub host: Option<String>,

    /// TCP API port.
    #[arg(long)]
    pub port: Option<u16>,

    /// Disable the FIFO command channel.
    #[arg(long)]
    pub no_fifo: bool,

    /// FIFO path for the command channel.
    #[arg(long)]
    pub fifo: Option<PathBuf>,

    /// Load a named layout after startup.
    #[arg(long)]
    pub layout: Option<String>,

    /// Run without a display; only the API and zones are active.
    #[arg(long)]
    pub headless: bool,
}
