//! Command-line interface

use clap::Parser;
use std::path::PathBuf;

/// Serve multiple files combined in a single request.
///
/// Files below DIRECTORY are available concatenated, in request order:
///
// Hidden from doctest collection: rustdoc would compile the indented line as Rust.
#[cfg_attr(
    not(doctest),
    doc = "     http://localhost:8080/?base.css&pure/grids.css&pure/buttons.css"
)]
#[derive(Debug, Parser)]
#[command(name = "comboserver", version, verbatim_doc_comment)]
pub struct Cli {
    /// Directory to serve files from (overrides `combo.root`)
    pub directory: Option<PathBuf>,

    /// Address to serve content from [default: localhost:8080]
    #[arg(long)]
    pub addr: Option<String>,

    /// URL path combined files are served at, empty for any path [default: /]
    #[arg(long = "root", value_name = "URL_PATH")]
    pub url_path: Option<String>,

    /// File list separator [default: &]
    #[arg(long = "sep", value_name = "SEPARATOR")]
    pub separator: Option<String>,

    /// Maximum files to concatenate in a single request [default: 50]
    #[arg(long = "maxfiles", value_name = "N")]
    pub max_files: Option<u64>,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Worker threads (defaults to CPU cores)
    #[arg(long)]
    pub workers: Option<u64>,
}
