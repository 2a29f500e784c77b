mod cli;

use clap::Parser;

use scopesrt::utils::init_logging;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug, cli.quiet);

    if let Err(error) = cli::run(cli.command) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
