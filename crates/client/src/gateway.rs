//! # Gateway
//!
//! Owns the movie store, the shared latency timer and one
//! [`StrategyDispatcher`] per strategy. Applications build a gateway once
//! at startup and route each request to the dispatcher for the strategy
//! the user picked.

use crate::config::ClientConfig;
use crate::dispatcher::StrategyDispatcher;
use anyhow::{Context, Result};
use database::MovieStore;
use recommender::{BackendHandle, BackendSettings, Strategy, Timer};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

#[derive(Clone)]
pub struct Gateway {
    store: Arc<MovieStore>,
    timer: Arc<Timer>,
    dispatchers: Arc<Vec<StrategyDispatcher<BackendHandle>>>,
}

impl Gateway {
    /// Wire one backend and dispatcher per strategy over `store`
    pub fn new(store: Arc<MovieStore>, settings: BackendSettings) -> Self {
        let timer = Arc::new(Timer::new());
        let dispatchers = Strategy::ALL
            .into_iter()
            .map(|strategy| {
                StrategyDispatcher::new(BackendHandle::new(
                    strategy,
                    Arc::clone(&store),
                    Arc::clone(&timer),
                    settings,
                ))
            })
            .collect();

        Self {
            store,
            timer,
            dispatchers: Arc::new(dispatchers),
        }
    }

    /// Load the dataset named by `config` and build a gateway over it
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let store = Self::load_store(&config.dataset)?;
        Ok(Self::new(Arc::new(store), config.backend))
    }

    fn load_store(path: &Path) -> Result<MovieStore> {
        let start = Instant::now();
        let store = MovieStore::load_from_file(path)
            .with_context(|| format!("Failed to load movie dataset from {}", path.display()))?;
        info!(
            "Loaded {} movies from {} in {:?}",
            store.count(),
            path.display(),
            start.elapsed()
        );
        Ok(store)
    }

    /// The dispatcher bound to `strategy`
    pub fn dispatcher(&self, strategy: Strategy) -> Option<&StrategyDispatcher<BackendHandle>> {
        self.dispatchers.iter().find(|d| d.strategy() == strategy)
    }

    pub fn store(&self) -> &Arc<MovieStore> {
        &self.store
    }

    pub fn timer(&self) -> &Arc<Timer> {
        &self.timer
    }

    /// Latency report across every strategy that served a timed request
    pub fn timings_report(&self) -> String {
        self.timer.report()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::Movie;

    #[test]
    fn test_one_dispatcher_per_strategy() {
        let store = Arc::new(MovieStore::from_movies(vec![Movie::new("Heat", vec![1.0])]));
        let gateway = Gateway::new(store, BackendSettings::default());

        for strategy in Strategy::ALL {
            let dispatcher = gateway.dispatcher(strategy).unwrap();
            assert_eq!(dispatcher.strategy(), strategy);
        }
        assert_eq!(gateway.store().count(), 1);
    }

    #[test]
    fn test_missing_dataset_has_context() {
        let config = ClientConfig {
            dataset: "/definitely/not/here.txt".into(),
            ..ClientConfig::default()
        };
        let err = Gateway::from_config(&config).err().unwrap();
        assert!(err.to_string().contains("Failed to load movie dataset"));
    }
}
