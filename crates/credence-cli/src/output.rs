//! Output formatting for the CLI.

use crate::config::{CredenceConfig, OutputFormat};
use crate::error::Result;
use credence_analyzer::AnalysisReport;
use credence_dispatch::HealthStatus;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format an analysis report.
    pub fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Text => Ok(self.format_report_text(report)),
        }
    }

    fn format_report_text(&self, report: &AnalysisReport) -> String {
        let verdict = if report.is_credible {
            self.colorize("CREDIBLE", "green")
        } else {
            self.colorize("NOT CREDIBLE", "red")
        };

        let mut out = vec![
            format!("Claim:      {}", report.claim),
            format!(
                "Verdict:    {} (score {:.3}, confidence {:.3})",
                verdict, report.credibility_score, report.confidence
            ),
            format!("Consensus:  {}", report.consensus),
            String::new(),
        ];

        if report.supporting_sources.is_empty() {
            out.push(self.colorize("No supporting sources cited.", "yellow"));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["#", "Title", "Domain", "Credibility", "URL"]);
            for (rank, source) in report.supporting_sources.iter().enumerate() {
                builder.push_record([
                    (rank + 1).to_string(),
                    source.title.clone(),
                    source.domain.clone(),
                    format!("{:.2}", source.credibility),
                    source.url.clone(),
                ]);
            }
            out.push(Self::render(builder));
        }
        out.push(String::new());

        let mut builder = Builder::default();
        builder.push_record(["Responder", "Score", "Confidence", "Sources", "Time (ms)"]);
        for responder in &report.per_responder_breakdown {
            let id = if responder.recovered {
                format!("{} (recovered)", responder.responder_id)
            } else {
                responder.responder_id.clone()
            };
            builder.push_record([
                id,
                format!("{:.2}", responder.score),
                format!("{:.2}", responder.confidence),
                responder.sources.len().to_string(),
                responder.processing_time_ms.to_string(),
            ]);
        }
        out.push(Self::render(builder));

        let meta = &report.metadata;
        let mut footer = format!(
            "Analysis {} · {} responders ({} recovered) · {} mode · {} ms",
            report.id,
            meta.responder_count,
            meta.recovered_count,
            meta.dispatch_mode,
            meta.processing_time_ms
        );
        if meta.fell_back {
            footer.push_str(" · fell back to simulation");
        }
        out.push(self.info(&footer));
        if meta.fell_back {
            out.push(self.warning("Responder network unreachable; verdict is simulated"));
        }

        out.join("\n")
    }

    /// Format dispatcher health.
    pub fn format_health(&self, health: &HealthStatus) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(health)?),
            OutputFormat::Text => {
                let responders = health
                    .last_known_responders
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "unknown".to_string());

                let mut builder = Builder::default();
                builder.push_record(["Setting", "Value"]);
                builder.push_record(["Mode".to_string(), health.mode.to_string()]);
                builder.push_record(["Fallback".to_string(), health.fallback_enabled.to_string()]);
                builder.push_record(["Responders".to_string(), responders]);
                builder.push_record(["Activity".to_string(), health.metrics.summary()]);

                Ok(Self::render(builder))
            }
        }
    }

    /// Format the effective configuration. Always TOML.
    pub fn format_config(&self, config: &CredenceConfig) -> Result<String> {
        config.to_toml()
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    fn render(builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credence_analyzer::AnalyzeRequest;
    use credence_dispatch::DispatchMode;

    fn simulated() -> CredenceConfig {
        CredenceConfig::default().with_mode(DispatchMode::Simulated)
    }

    async fn sample_report(claim: &str) -> AnalysisReport {
        let analyzer = simulated().build_analyzer().unwrap();
        analyzer.analyze(AnalyzeRequest::new(claim)).await.unwrap()
    }

    #[tokio::test]
    async fn test_text_report() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        let report = sample_report("The Great Wall is visible from orbit").await;
        let output = formatter.format_report(&report).unwrap();

        assert!(output.contains("Claim:      The Great Wall is visible from orbit"));
        assert!(output.contains("CREDIBLE"));
        assert!(output.contains("Responder"));
        assert!(output.contains("simulated-1"));
        assert!(output.contains("3 responders (0 recovered)"));
        assert!(!output.contains("fell back"));
    }

    #[tokio::test]
    async fn test_json_report() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let report = sample_report("Honey never spoils").await;
        let output = formatter.format_report(&report).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["claim"], "Honey never spoils");
        assert!(value["credibilityScore"].is_f64());
        assert_eq!(value["metadata"]["responderCount"], 3);
    }

    #[tokio::test]
    async fn test_recovered_responder_marked() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        let mut report = sample_report("Honey never spoils").await;
        report.per_responder_breakdown[0].recovered = true;
        report.metadata.fell_back = true;

        let output = formatter.format_report(&report).unwrap();
        assert!(output.contains("(recovered)"));
        assert!(output.contains("fell back to simulation"));
        assert!(output.contains("⚠ Responder network unreachable"));
    }

    #[tokio::test]
    async fn test_no_sources() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        let mut report = sample_report("Honey never spoils").await;
        report.supporting_sources.clear();

        let output = formatter.format_report(&report).unwrap();
        assert!(output.contains("No supporting sources cited."));
    }

    #[test]
    fn test_health_text() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        let health = simulated().build_analyzer().unwrap().health();

        let output = formatter.format_health(&health).unwrap();
        assert!(output.contains("simulated"));
        assert!(output.contains("unknown"));
    }

    #[test]
    fn test_health_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let health = simulated().build_analyzer().unwrap().health();

        let value: serde_json::Value =
            serde_json::from_str(&formatter.format_health(&health).unwrap()).unwrap();
        assert_eq!(value["mode"], "simulated");
    }

    #[test]
    fn test_config_is_toml() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_config(&simulated()).unwrap();
        assert!(output.contains("[dispatch]"));
        assert!(output.contains("mode = \"simulated\""));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        assert_eq!(formatter.warning("test"), "⚠ test");
    }
}
