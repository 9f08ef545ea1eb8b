use std::process;

use cflat::driver::{run, Args};
use clap::Parser;

fn main() {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    process::exit(run(&args));
}
