use anyhow::Result;
use std::process::ExitCode;

mod app;
mod logging;

use atomicfs::cli;

fn main() -> Result<ExitCode> {
    let args = cli::parse();
    app::run(args)
}
