//! End-to-end tests: gateway, dispatcher and real backends over one store.

use client::{Gateway, collect_rankings};
use database::{Movie, MovieStore};
use recommender::{BackendSettings, RecommenderError, Strategy};
use std::sync::Arc;

fn gateway() -> Gateway {
    let store = MovieStore::from_movies(vec![
        Movie::new("Inception", vec![0.9, 0.85, 0.4]),
        Movie::new("Interstellar", vec![0.4, 0.95, 0.7]),
        Movie::new("Insomnia", vec![0.3, 0.05, 0.75]),
        Movie::new("Memento", vec![0.8, 0.3, 0.6]),
    ]);
    Gateway::new(Arc::new(store), BackendSettings::default())
}

fn titles(rankings: &[recommender::Ranking]) -> Vec<&str> {
    rankings.iter().map(|r| r.title.as_str()).collect()
}

#[tokio::test]
async fn test_search_through_every_dispatcher() {
    let gateway = gateway();
    for strategy in Strategy::ALL {
        let dispatcher = gateway.dispatcher(strategy).unwrap();
        let stream = dispatcher.search(strategy.as_str(), "in", false).unwrap();
        let found = collect_rankings(stream).await.unwrap();
        assert_eq!(titles(&found), vec!["Inception", "Insomnia", "Interstellar"]);
    }
}

#[tokio::test]
async fn test_recommendations_agree_across_strategies() {
    let gateway = gateway();
    let mut results = Vec::new();
    for strategy in Strategy::ALL {
        let dispatcher = gateway.dispatcher(strategy).unwrap();
        let stream = dispatcher
            .recommendations(strategy.as_str(), "Inception", 2, false)
            .unwrap();
        results.push(collect_rankings(stream).await.unwrap());
    }

    assert_eq!(results[0].len(), 2);
    assert!(!titles(&results[0]).contains(&"Inception"));
    assert!(results.iter().all(|r| r == &results[0]));
}

#[tokio::test]
async fn test_wrong_strategy_is_refused() {
    let gateway = gateway();
    let dispatcher = gateway.dispatcher(Strategy::ParallelFlux).unwrap();

    let err = dispatcher.movies("sequentialloop", true).err().unwrap();
    assert!(matches!(
        err,
        RecommenderError::StrategyMismatch { expected: Strategy::ParallelFlux, .. }
    ));
    assert_eq!(gateway.timer().sample_count(), 0);
}

#[tokio::test]
async fn test_timed_requests_show_up_in_report() {
    let gateway = gateway();
    assert_eq!(gateway.timings_report(), "no timings recorded");

    let dispatcher = gateway.dispatcher(Strategy::StructuredConcurrency).unwrap();
    let stream = dispatcher
        .recommendations("STRUCTURED_CONCURRENCY", "Memento", 3, true)
        .unwrap();
    collect_rankings(stream).await.unwrap();

    let report = gateway.timings_report();
    assert!(report.starts_with("structuredconcurrency recommendations: 1 run(s)"));
}

#[tokio::test]
async fn test_backend_errors_pass_through_unchanged() {
    let gateway = gateway();
    let dispatcher = gateway.dispatcher(Strategy::ParallelStream).unwrap();

    let stream = dispatcher
        .recommendations("parallelstream", "Inception", 0, false)
        .unwrap();
    let err = collect_rankings(stream).await.unwrap_err();
    assert!(matches!(err, RecommenderError::InvalidQuery(_)));
}
