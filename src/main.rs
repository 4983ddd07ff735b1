mod app;
mod config;
mod handler;
mod logging;
mod persistence;
mod repository;
mod server;
mod service;

use clap::Parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = config::Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(app::run(cli))
}
