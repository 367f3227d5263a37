use clap::Parser;
use log::{debug, LevelFilter};

mod args;
mod socio;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();
    debug!("main: args: {:?}", args);

    if let Err(e) = socio::run(&args) {
        debug!("main: error: {:?}", e);
        eprintln!("Processing failed: {}", e);
        std::process::exit(1);
    }
}
