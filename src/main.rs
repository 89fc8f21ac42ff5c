use std::process;

use pruner::cli::{Args, Command};

fn main() {
    let args = Args::parse_args();
    let exit_code = Command::from_args(args).run();
    process::exit(exit_code);
}
