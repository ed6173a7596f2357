mod app;
mod audio;
mod catalog;
mod clock;
mod config;
mod fetch;
mod filter;
mod mpris;
mod runtime;
mod starfield;
mod transport;
mod ui;
mod visualizer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
