use clap::Parser;
use txtsync::config::Cli;
use txtsync::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli)?;

    let report = txtsync::commands::sync::run(config)?;

    // Partial failure: every file was attempted, but at least one failed.
    if !report.is_clean() {
        std::process::exit(1);
    }

    Ok(())
}
