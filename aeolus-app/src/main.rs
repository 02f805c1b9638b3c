//! Binary crate for the `aeolus` weather window.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - The terminal window (layout, search box, light/dark toggle)
//! - Persisting preferences on user actions

use clap::Parser;

mod app;
mod cli;
mod icon;
mod logging;
mod theme;
mod tui;
mod ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logging::init(cmd.log_target());
    cmd.run().await
}
