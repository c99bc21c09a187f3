//! Command line interface

use clap::Parser;
use std::path::PathBuf;

/// Static file server with byte-range support for seeking in media files
#[derive(Debug, Parser)]
#[command(name = "range-server", version, about)]
pub struct Cli {
    /// Port to listen on [default: 8000]
    pub port: Option<u16>,

    /// Address to bind [default: 0.0.0.0]
    #[arg(short, long, value_name = "ADDRESS")]
    pub bind: Option<String>,

    /// Directory to serve [default: current directory]
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Configuration file (extension optional)
    #[arg(short, long, default_value = "config")]
    pub config: String,
}
