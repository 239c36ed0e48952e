use clap::Parser;
use sbiectl::cli::{execute_command, Cli};
use sbiectl::utils::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = execute_command(cli) {
        eprintln!("sbiectl: {e:#}");
        std::process::exit(1);
    }
}
