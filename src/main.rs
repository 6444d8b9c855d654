//! Photoforge - AI passport photos and portraits from the command line.

mod adapters;
mod app;
mod camera;
mod cassette;
mod catalog;
mod cli;
mod config;
mod context;
mod error;
mod generation;
mod logging;
mod media;
mod model;
mod options;
mod output;
mod params;
mod ports;
mod present;
mod prompts;
mod workflow;

use std::process;

use clap::Parser;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = app::run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
