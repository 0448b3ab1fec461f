use clap::Parser;
use tidydesk::cli::{Cli, run};
use tidydesk::output::OutputFormatter;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        OutputFormatter::error(&e);
        std::process::exit(1);
    }
}
