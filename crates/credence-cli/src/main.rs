//! Credence CLI - Command-line interface for claim credibility analysis.

use clap::Parser;
use credence_cli::commands;
use credence_cli::{Cli, Command, CredenceConfig, Formatter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> credence_cli::Result<()> {
    let cli = Cli::parse();
    credence_cli::init_tracing(cli.verbose);

    let mut config = CredenceConfig::load(cli.config.as_deref())?;
    if let Some(mode) = cli.mode {
        config = config.with_mode(mode.into());
    }
    config.validate()?;

    let format = cli.format.map(Into::into).unwrap_or(config.output.format);
    let color_enabled = !cli.no_color && config.output.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Config => commands::execute_config(&config, &formatter)?,
        Command::Analyze(args) => {
            let analyzer = config.build_analyzer()?;
            commands::execute_analyze(args, &analyzer, &formatter).await?;
        }
        Command::Health(args) => {
            let analyzer = config.build_analyzer()?;
            commands::execute_health(args, &analyzer, &formatter).await?;
        }
    }

    Ok(())
}
