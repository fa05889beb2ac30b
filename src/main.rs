use clap::Parser;
use mizan::cli::{run, setup_logger, Cli};

fn main() -> std::process::ExitCode {
    setup_logger();
    run(Cli::parse())
}
