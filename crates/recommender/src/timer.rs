//! Latency bookkeeping for timed requests.
//!
//! Timed variants of the backend operations report how long they took
//! here. The timer keeps every sample and renders a plain-text summary per
//! strategy and operation.

use crate::types::Strategy;
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

/// The backend operation a timing sample belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    Movies,
    Search,
    Recommendations,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Movies => "movies",
            Operation::Search => "search",
            Operation::Recommendations => "recommendations",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate view of the samples for one strategy/operation pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingSummary {
    pub count: usize,
    pub average: Duration,
    pub min: Duration,
    pub max: Duration,
}

impl TimingSummary {
    fn from_samples(samples: &[Duration]) -> Option<Self> {
        let min = samples.iter().min().copied()?;
        let max = samples.iter().max().copied()?;
        let total: Duration = samples.iter().sum();
        Some(Self {
            count: samples.len(),
            average: total / samples.len() as u32,
            min,
            max,
        })
    }
}

/// Collects elapsed times from timed backend calls.
///
/// Shared between backends through an `Arc`; recording takes a short lock.
#[derive(Debug, Default)]
pub struct Timer {
    samples: Mutex<BTreeMap<(Strategy, Operation), Vec<Duration>>>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store one sample and log it
    pub fn record(&self, strategy: Strategy, operation: Operation, elapsed: Duration) {
        info!(
            strategy = %strategy,
            operation = %operation,
            "{} {} took {:.2?}",
            strategy,
            operation,
            elapsed
        );
        let mut samples = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        samples.entry((strategy, operation)).or_default().push(elapsed);
    }

    pub fn summary(&self, strategy: Strategy, operation: Operation) -> Option<TimingSummary> {
        let samples = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        samples
            .get(&(strategy, operation))
            .and_then(|s| TimingSummary::from_samples(s))
    }

    /// Total number of samples recorded so far
    pub fn sample_count(&self) -> usize {
        let samples = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        samples.values().map(Vec::len).sum()
    }

    pub fn reset(&self) {
        self.samples.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// Render every summary as text, one line per strategy/operation,
    /// ordered by strategy then operation.
    pub fn report(&self) -> String {
        let samples = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        if samples.is_empty() {
            return "no timings recorded".to_string();
        }

        let mut report = String::new();
        for ((strategy, operation), durations) in samples.iter() {
            if let Some(summary) = TimingSummary::from_samples(durations) {
                let _ = writeln!(
                    report,
                    "{strategy} {operation}: {} run(s), avg {:.2?}, min {:.2?}, max {:.2?}",
                    summary.count, summary.average, summary.min, summary.max
                );
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let timer = Timer::new();
        timer.record(Strategy::SequentialLoop, Operation::Search, Duration::from_millis(10));
        timer.record(Strategy::SequentialLoop, Operation::Search, Duration::from_millis(30));

        let summary = timer
            .summary(Strategy::SequentialLoop, Operation::Search)
            .unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.average, Duration::from_millis(20));
        assert_eq!(summary.min, Duration::from_millis(10));
        assert_eq!(summary.max, Duration::from_millis(30));

        assert!(timer.summary(Strategy::ParallelFlux, Operation::Search).is_none());
    }

    #[test]
    fn test_report_order() {
        let timer = Timer::new();
        assert_eq!(timer.report(), "no timings recorded");

        timer.record(Strategy::SequentialLoop, Operation::Movies, Duration::from_millis(1));
        timer.record(Strategy::ParallelFlux, Operation::Recommendations, Duration::from_millis(2));

        let report = timer.report();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("parallelflux recommendations"));
        assert!(lines[1].starts_with("sequentialloop movies"));
    }

    #[test]
    fn test_reset() {
        let timer = Timer::new();
        timer.record(Strategy::ParallelStream, Operation::Movies, Duration::from_millis(1));
        assert_eq!(timer.sample_count(), 1);
        timer.reset();
        assert_eq!(timer.sample_count(), 0);
    }
}
