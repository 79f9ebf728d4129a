use anyhow::Result;
use clap::Parser;
use proto_breaking_change_detector::cli::{self, Cli};

fn main() -> Result<()> {
    // RUST_LOG controls verbosity; warnings and errors show by default.
    let env = env_logger::Env::default().default_filter_or("warn");
    env_logger::Builder::from_env(env).init();

    let cli = Cli::parse();
    let findings = cli::run(&cli)?;
    let breaking = findings.get_breaking_findings().len();
    log::info!("{} breaking change(s)", breaking);
    Ok(())
}
