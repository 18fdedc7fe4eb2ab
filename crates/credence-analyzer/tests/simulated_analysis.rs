//! End-to-end analysis in simulation mode

use credence_aggregator::AggregationConfig;
use credence_analyzer::{AnalyzeRequest, Analyzer, AnalyzerConfig};
use credence_dispatch::{DispatchConfig, DispatchMode};
use credence_domain::ClaimKind;

fn simulated_analyzer() -> Analyzer {
    Analyzer::new(
        AnalyzerConfig::default(),
        DispatchConfig::simulated(),
        AggregationConfig::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_report_shape() {
    let analyzer = simulated_analyzer();

    let report = analyzer
        .analyze(AnalyzeRequest::new("According to published census data, the city grew 4 percent"))
        .await
        .unwrap();

    assert_eq!(report.per_responder_breakdown.len(), 3);
    assert_eq!(report.metadata.responder_count, 3);
    assert_eq!(report.metadata.dispatch_mode, DispatchMode::Simulated);
    assert!(!report.metadata.fell_back);
    assert!((0.0..=1.0).contains(&report.credibility_score));
    assert!((0.0..=1.0).contains(&report.confidence));
    assert_eq!(report.is_credible, report.credibility_score >= 0.6);
    assert!(!report.supporting_sources.is_empty());
    assert!(report.supporting_sources.len() <= 10);
    assert!(report
        .supporting_sources
        .windows(2)
        .all(|w| w[0].credibility >= w[1].credibility));
    assert!(report.consensus.contains("3 responders evaluated the claim"));
}

#[tokio::test]
async fn test_same_claim_same_verdict() {
    let analyzer = simulated_analyzer();
    let request = AnalyzeRequest::new("Lightning never strikes the same place twice").with_min_responders(8);

    let first = analyzer.analyze(request.clone()).await.unwrap();
    let second = analyzer.analyze(request).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.credibility_score.to_bits(), second.credibility_score.to_bits());
    assert_eq!(first.confidence.to_bits(), second.confidence.to_bits());
    assert_eq!(first.is_credible, second.is_credible);
    assert_eq!(first.consensus, second.consensus);
    assert_eq!(first.supporting_sources, second.supporting_sources);
}

#[tokio::test]
async fn test_reference_claim() {
    let analyzer = simulated_analyzer();

    let report = analyzer
        .analyze(AnalyzeRequest::new("https://www.reuters.com/world/some-story").with_kind(ClaimKind::Reference))
        .await
        .unwrap();

    assert_eq!(report.kind, ClaimKind::Reference);
    assert_eq!(report.metadata.responder_count, 3);
}

#[tokio::test]
async fn test_report_serializes_camel_case() {
    let analyzer = simulated_analyzer();

    let report = analyzer.analyze(AnalyzeRequest::new("Bananas are berries")).await.unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert!(json["credibilityScore"].is_f64());
    assert!(json["isCredible"].is_boolean());
    assert!(json["perResponderBreakdown"].is_array());
    assert!(json["metadata"]["processedAt"].is_string());
    assert_eq!(json["metadata"]["dispatchMode"], "simulated");
    assert_eq!(json["id"].as_str().unwrap().len(), 36);
}

#[tokio::test]
async fn test_health_counts_runs() {
    let analyzer = simulated_analyzer();
    analyzer.analyze(AnalyzeRequest::new("Claim one")).await.unwrap();
    analyzer.analyze(AnalyzeRequest::new("Claim two")).await.unwrap();

    let health = analyzer.health();
    assert_eq!(health.mode, DispatchMode::Simulated);
    assert_eq!(health.metrics.dispatches, 2);
    assert_eq!(health.metrics.simulated_runs, 2);
    assert_eq!(health.metrics.recovered_responses, 0);
}
