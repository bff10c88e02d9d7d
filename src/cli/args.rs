//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

use crate::core::BuildMode;

/// Package a web UI build into firmware-embeddable assets
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Root of the shared UI package, linked into the project before building
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub package_root: PathBuf,

    /// Project root holding the UI sources
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub source_root: PathBuf,

    /// Directory the UI is staged into and built in
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub build_root: PathBuf,

    /// When to run the UI build: 0/full (always), 1/once (if no header yet), 2/never
    #[arg(long, value_name = "MODE")]
    pub build_mode: BuildMode,

    /// Config file path (default: embedui.toml in the source root)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Print debug output
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
