mod config;
mod console;
mod controller;
mod error;
mod game;
mod interface;
mod model;
mod nav;
mod seed;
mod store;
mod view;

use std::rc::Rc;

use anyhow::{Context, Result};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use config::{AppConfig, DATA_DIR_ENV, USAGE};
use console::StdConsole;
use game::round::CatalogRoundResolver;
use nav::{Exit, Navigator};
use store::Catalog;

fn main() -> Result<()> {
    // Logs go to stderr and stay quiet by default so they don't mix with the
    // menus. Control verbosity with RUST_LOG:
    //   RUST_LOG=info   answer-and-win   # games played, records changed
    //   RUST_LOG=debug  answer-and-win   # + every menu transition and round
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(config) = AppConfig::from_args(&args, std::env::var(DATA_DIR_ENV).ok()) else {
        println!("{USAGE}");
        return Ok(());
    };
    info!("Using data directory {}", config.data_dir.display());

    let catalog = Rc::new(Catalog::open(&config.data_dir));
    if seed::seed_if_empty(&catalog).context("failed to seed the catalog")? {
        println!("Created starter questions in {}", config.data_dir.display());
    }

    let resolver = CatalogRoundResolver::new(catalog.clone(), StdRng::from_entropy());
    let tree = interface::build(catalog, resolver);

    let exit = Navigator::default()
        .run(&tree, &mut StdConsole)
        .map_err(anyhow::Error::new)
        .context("menu navigation failed")?;
    info!("Navigation ended: {exit:?}");

    if exit == Exit::Closed {
        println!("Thanks for playing!");
    }
    Ok(())
}
