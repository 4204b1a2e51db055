mod app;
mod audio;
mod config;
mod error;
mod library;
mod logging;
mod lyrics;
mod mpris;
mod persist;
mod player;
mod runtime;
mod theme;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
