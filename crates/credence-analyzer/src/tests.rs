//! Pipeline tests for the Analyzer

#[cfg(test)]
mod tests {
    use crate::{AnalyzeRequest, Analyzer, AnalyzerConfig, AnalyzerError};
    use async_trait::async_trait;
    use credence_aggregator::{AggregationError, RobustAggregator};
    use credence_dispatch::{
        DispatchConfig, DispatchError, DispatchMode, DispatchStrategy, MinerQueryDispatcher,
    };
    use credence_domain::{ClaimKind, ClaimQuery};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// Strategy that returns fixed payloads and records the queries it saw
    struct FixedStrategy {
        payloads: Result<Vec<Value>, DispatchError>,
        seen: Arc<Mutex<Vec<ClaimQuery>>>,
    }

    #[async_trait]
    impl DispatchStrategy for FixedStrategy {
        async fn fetch(&self, query: &ClaimQuery) -> Result<Vec<Value>, DispatchError> {
            self.seen.lock().unwrap().push(query.clone());
            self.payloads.clone()
        }

        fn mode(&self) -> DispatchMode {
            DispatchMode::Live
        }
    }

    fn analyzer_with(
        payloads: Result<Vec<Value>, DispatchError>,
    ) -> (Analyzer, Arc<Mutex<Vec<ClaimQuery>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let strategy = FixedStrategy {
            payloads,
            seen: seen.clone(),
        };
        let dispatcher = MinerQueryDispatcher::with_strategy(
            DispatchConfig::strict_live("http://network.invalid"),
            Box::new(strategy),
        );
        let analyzer = Analyzer::from_parts(
            AnalyzerConfig::default(),
            dispatcher,
            RobustAggregator::default_config(),
        )
        .unwrap();
        (analyzer, seen)
    }

    fn outlier_batch() -> Vec<Value> {
        vec![
            json!({"uid": "a", "score": 0.9, "confidence": 0.8, "reasoning": "Reliable sources agree. Peer review confirms.", "sources": ["https://www.nature.com/a"]}),
            json!({"uid": "b", "score": 0.88, "confidence": 0.8, "reasoning": "Reliable sources agree.", "sources": ["https://www.nature.com/a", "https://www.reuters.com/b"]}),
            json!({"uid": "c", "score": 0.9, "confidence": 0.8, "reasoning": "Matches official data.", "sources": []}),
            json!({"uid": "d", "score": 0.87, "confidence": 0.8, "reasoning": "Consistent with peer review.", "sources": []}),
            json!({"uid": "e", "score": 0.05, "confidence": 0.8, "reasoning": "Misleading.", "sources": []}),
        ]
    }

    #[tokio::test]
    async fn test_full_analysis_flow() {
        let (analyzer, seen) = analyzer_with(Ok(outlier_batch()));

        let report = analyzer
            .analyze(AnalyzeRequest::new("  Coral reefs cover under 1% of the ocean floor  ").with_min_responders(5))
            .await
            .unwrap();

        assert!(report.credibility_score >= 0.7);
        assert!(report.is_credible);
        assert_eq!(report.claim, "Coral reefs cover under 1% of the ocean floor");
        assert_eq!(report.per_responder_breakdown.len(), 5);
        assert_eq!(report.metadata.responder_count, 5);
        assert_eq!(report.metadata.recovered_count, 0);
        assert_eq!(report.metadata.dispatch_mode, DispatchMode::Live);
        assert!(report.consensus.contains("5 responders"));
        assert!(report.consensus.contains("reliable sources"));

        // nature.com cited twice: (0.9 + 0.88) / 2
        assert_eq!(report.supporting_sources[0].domain, "nature.com");
        assert!((report.supporting_sources[0].credibility - 0.89).abs() < 1e-12);

        let queries = seen.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].min_responders(), 5);
        assert_eq!(queries[0].timeout_ms(), 30_000);
    }

    #[tokio::test]
    async fn test_malformed_payload_in_breakdown() {
        let mut batch = outlier_batch();
        batch[4] = json!(null);
        let (analyzer, _) = analyzer_with(Ok(batch));

        let report = analyzer.analyze(AnalyzeRequest::new("claim").with_min_responders(5)).await.unwrap();

        assert_eq!(report.metadata.recovered_count, 1);
        let recovered = &report.per_responder_breakdown[4];
        assert!(recovered.recovered);
        assert_eq!(recovered.confidence, 0.1);
        assert_eq!(recovered.score, 0.5);
    }

    #[tokio::test]
    async fn test_short_batch_still_aggregates() {
        let (analyzer, _) = analyzer_with(Ok(outlier_batch()[..2].to_vec()));

        let report = analyzer.analyze(AnalyzeRequest::new("claim").with_min_responders(5)).await.unwrap();

        assert_eq!(report.metadata.responder_count, 2);
    }

    #[tokio::test]
    async fn test_empty_batch_is_empty_input() {
        let (analyzer, _) = analyzer_with(Ok(vec![]));

        let result = analyzer.analyze(AnalyzeRequest::new("claim")).await;

        assert_eq!(result.unwrap_err(), AnalyzerError::Aggregation(AggregationError::EmptyInput));
    }

    #[tokio::test]
    async fn test_timeout_propagates() {
        let (analyzer, _) = analyzer_with(Err(DispatchError::Timeout(30_000)));

        let result = analyzer.analyze(AnalyzeRequest::new("claim")).await;

        assert_eq!(result.unwrap_err(), AnalyzerError::Dispatch(DispatchError::Timeout(30_000)));
    }

    #[tokio::test]
    async fn test_invalid_requests_never_dispatch() {
        let (analyzer, seen) = analyzer_with(Ok(outlier_batch()));

        let too_long = "x".repeat(2001);
        let requests = vec![
            AnalyzeRequest::new("   "),
            AnalyzeRequest::new(too_long),
            AnalyzeRequest::new("claim").with_min_responders(0),
            AnalyzeRequest::new("claim").with_min_responders(21),
            AnalyzeRequest::new("claim").with_timeout_ms(4_999),
            AnalyzeRequest::new("claim").with_timeout_ms(60_001),
            AnalyzeRequest::new("not a link").with_kind(ClaimKind::Reference),
            AnalyzeRequest::new("ftp://files.example/x").with_kind(ClaimKind::Reference),
        ];

        for request in requests {
            let result = analyzer.analyze(request).await;
            assert!(matches!(result, Err(AnalyzerError::InvalidRequest(_))));
        }
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_resolve_bounds_inclusive() {
        let (analyzer, _) = analyzer_with(Ok(vec![]));

        let exact = "y".repeat(2000);
        assert!(analyzer.resolve(&AnalyzeRequest::new(exact)).is_ok());

        let query = analyzer
            .resolve(&AnalyzeRequest::new("claim").with_min_responders(20).with_timeout_ms(60_000))
            .unwrap();
        assert_eq!(query.min_responders(), 20);
        assert_eq!(query.timeout_ms(), 60_000);

        let query = analyzer
            .resolve(&AnalyzeRequest::new("claim").with_min_responders(1).with_timeout_ms(5_000))
            .unwrap();
        assert_eq!(query.min_responders(), 1);

        let reference = analyzer
            .resolve(&AnalyzeRequest::new("https://www.bbc.com/news/x").with_kind(ClaimKind::Reference))
            .unwrap();
        assert_eq!(reference.kind(), ClaimKind::Reference);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AnalyzerConfig {
            max_claim_chars: 0,
            ..AnalyzerConfig::default()
        };
        let dispatcher = MinerQueryDispatcher::new(DispatchConfig::simulated()).unwrap();

        let result = Analyzer::from_parts(config, dispatcher, RobustAggregator::default_config());
        assert!(matches!(result, Err(AnalyzerError::Config(_))));
    }
}
