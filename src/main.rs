use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;

use riffkit::{cli::Cli, config, logging};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config file first, command line on top
    let options = config::load_config(cli.config.as_deref())?;
    let options = cli.merge_into_options(options)?;

    logging::init(options.log_level);
    log::debug!("Options: {:?}", options);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    cli.execute(&options, &mut out)?;
    out.flush()?;
    Ok(())
}
