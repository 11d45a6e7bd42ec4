mod app;
mod bookmarks;
mod border;
mod canvas;
mod cli;
mod clipboard;
mod commands;
mod config;
mod events;
mod grid;
mod layouts;
mod logging;
mod project;
mod server;
mod term;
mod test_utils;
mod viewport;
mod zones;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();
    logging::init();
    std::process::exit(app::run(cli));
}
