//! Health command implementation.

use crate::cli::HealthArgs;
use crate::error::Result;
use crate::output::Formatter;
use credence_analyzer::Analyzer;

/// Execute the health command.
pub async fn execute_health(args: HealthArgs, analyzer: &Analyzer, formatter: &Formatter) -> Result<()> {
    let health = if args.probe {
        analyzer.probe().await?
    } else {
        analyzer.health()
    };

    println!("{}", formatter.format_health(&health)?);
    Ok(())
}
