//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::error::Result;
use crate::output::Formatter;
use credence_analyzer::{AnalyzeRequest, Analyzer};

/// Execute the analyze command.
pub async fn execute_analyze(
    args: AnalyzeArgs,
    analyzer: &Analyzer,
    formatter: &Formatter,
) -> Result<()> {
    let mut request = AnalyzeRequest::new(args.claim).with_kind(args.kind.into());
    if let Some(min_responders) = args.min_responders {
        request = request.with_min_responders(min_responders);
    }
    if let Some(timeout_ms) = args.timeout_ms {
        request = request.with_timeout_ms(timeout_ms);
    }

    let report = analyzer.analyze(request).await?;
    println!("{}", formatter.format_report(&report)?);

    Ok(())
}
