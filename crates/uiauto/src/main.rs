use clap::Parser;
use log::info;
use uiauto::cli::{self, Cli};

/// Entry point for the uiauto CLI.
fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let args = Cli::parse();
    info!("running command: {:?}", args.command);
    let output = cli::run(args)?;
    print!("{output}");
    Ok(())
}
