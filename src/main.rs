//! embedui - packages a web UI build into firmware-embeddable assets.

mod asset;
mod cli;
mod config;
mod core;
mod logger;
mod manifest;
mod package;
mod tool;
mod utils;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, build::build_ui};
use config::{CONFIG_FILE, Config};
use crate::core::CancelToken;
use utils::path::{normalize_path, resolve_path};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // if_supports_color checks the stream
    }
    logger::set_verbose(cli.verbose);

    // Setup Ctrl+C handler before the external build can start
    let cancel = CancelToken::new();
    core::setup_shutdown_handler(&cancel)?;

    let source_root = normalize_path(&cli.source_root);
    let (config_path, explicit) = match &cli.config {
        Some(path) => (resolve_path(path, &source_root), true),
        None => (source_root.join(CONFIG_FILE), false),
    };
    let config = Config::load(&config_path, explicit)
        .with_context(|| format!("Failed to load config `{}`", config_path.display()))?;

    build_ui(&cli, &config, cancel)
}
