use clap::Parser;
use drt_lib::cli::{self, Cli};
use log::error;

#[allow(clippy::print_stderr, reason = "final error report for the terminal user")]
fn main() {
    let cli = Cli::parse();
    cli::init_logging(cli.verbose);

    if let Err(e) = cli::run(cli) {
        error!("drt failed: {e}");
        eprintln!("drt: {e}");
        std::process::exit(1);
    }
}
