//! docrun CLI entry point

use std::path::PathBuf;

use docrun::cli::{self, CliInvocation, Command};
use docrun::common::{config, logging, Configuration, Result};
use docrun::formatters::FormatterRegistry;
use docrun::runner::ActionRunner;

#[tokio::main]
async fn main() {
    logging::init_cli();

    let invocation = cli::parse(std::env::args().collect());

    let code = match invocation.command {
        Command::Run => match run(invocation).await {
            Ok(true) => 0,
            Ok(false) => 1,
            Err(e) => {
                eprintln!("Error: {e}");
                1
            }
        },
    };
    std::process::exit(code);
}

/// Drive one run; returns whether every action passed or was skipped.
async fn run(invocation: CliInvocation) -> Result<bool> {
    let config_path = invocation
        .config
        .as_ref()
        .map(PathBuf::from)
        .or_else(config::default_config_path);

    let configuration = Configuration::resolve(config_path.as_deref())?.apply(&invocation);

    let formatter = FormatterRegistry::new().get_formatter(&configuration.format)?;

    let mut runner = ActionRunner::new(configuration, formatter);
    let report = runner.run().await?;

    Ok(report.summary.success())
}
