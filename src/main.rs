use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pageforge::config::{Options, CONFIG_FILE};
use pageforge::logging::{self, Severity};
use pageforge::Site;

#[derive(Parser)]
#[command(about, version)]
struct Args {
    /// path to the json build config
    #[arg(default_value = CONFIG_FILE)]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    logging::init(Severity::from_env());
    let args = Args::parse();

    let options = Options::load(&args.config);
    Site::new(options).run().context("Build failed")?;
    Ok(())
}
