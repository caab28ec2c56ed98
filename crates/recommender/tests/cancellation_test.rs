//! Cancellation and span propagation, observed through captured logs.
//!
//! Every scored chunk emits a `trace!` line, so counting those lines tells
//! how much work ran after a request was dropped.

use database::{Catalog, Movie, MovieStore};
use recommender::ranker::WatchedProfile;
use recommender::{
    BackendHandle, BackendSettings, ParallelFlux, ParallelStream, RecommenderApi, ScoringStrategy,
    SequentialLoop, Strategy, StructuredConcurrency, Timer,
};
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use tokio_stream::StreamExt;
use tracing_subscriber::fmt::MakeWriter;

const SCORED: &str = "Scored chunk";

/// In-memory sink for the global test subscriber
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    fn lines(&self) -> Vec<String> {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf).lines().map(str::to_string).collect()
    }

    fn count(&self, needle: &str) -> usize {
        self.lines().iter().filter(|line| line.contains(needle)).count()
    }

    fn find(&self, needle: &str) -> Option<String> {
        self.lines().into_iter().find(|line| line.contains(needle))
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture() -> &'static LogCapture {
    static CAPTURE: OnceLock<LogCapture> = OnceLock::new();
    CAPTURE.get_or_init(|| {
        let capture = LogCapture::default();
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(capture.clone())
            .init();
        capture
    })
}

fn catalog(size: usize) -> Arc<Catalog> {
    Arc::new(Catalog::from_movies((0..size).map(|i| {
        let angle = i as f64 * 0.21;
        Movie::new(format!("Movie {i:04}"), vec![angle.cos(), angle.sin(), 0.5])
    })))
}

fn strategies() -> Vec<Box<dyn ScoringStrategy>> {
    vec![
        Box::new(SequentialLoop::new()),
        Box::new(ParallelStream::new()),
        Box::new(StructuredConcurrency::new().with_chunk_size(16)),
        Box::new(ParallelFlux::new().with_chunk_size(16)),
    ]
}

#[test]
fn test_dropped_scoring_skips_queued_chunks() {
    let capture = capture();

    // One blocking thread: parking it keeps every scoring chunk queued
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .max_blocking_threads(1)
        .enable_all()
        .build()
        .unwrap();

    let catalog = catalog(1_000);
    let profile = Arc::new(WatchedProfile::resolve(&catalog, &["Movie 0000"]).unwrap());

    runtime.block_on(async {
        for strategy in strategies() {
            let name = strategy.strategy();

            let before = capture.count(SCORED);
            let scored = strategy
                .score(Arc::clone(&catalog), Arc::clone(&profile))
                .await
                .unwrap();
            assert_eq!(scored.len(), 999);
            assert!(capture.count(SCORED) > before, "{name} logs the chunks it scores");

            let (release, parked) = std::sync::mpsc::channel::<()>();
            let gate = tokio::task::spawn_blocking(move || {
                let _ = parked.recv();
            });

            let before = capture.count(SCORED);
            let outcome = tokio::time::timeout(
                Duration::from_millis(50),
                strategy.score(Arc::clone(&catalog), Arc::clone(&profile)),
            )
            .await;
            assert!(outcome.is_err(), "{name} finished while the pool was parked");

            release.send(()).unwrap();
            gate.await.unwrap();
            // Queued behind whatever the dropped request left on the pool
            tokio::task::spawn_blocking(|| ()).await.unwrap();

            assert_eq!(
                capture.count(SCORED),
                before,
                "{name} kept scoring after its request was dropped"
            );
        }
    });
}

#[tokio::test]
async fn test_producer_logs_carry_request_span() {
    let capture = capture();
    let store = Arc::new(MovieStore::from_movies(vec![Movie::new("Heat", vec![1.0, 0.0])]));
    let backend = BackendHandle::new(
        Strategy::SequentialLoop,
        store,
        Arc::new(Timer::new()),
        BackendSettings::default(),
    );

    let mut stream = backend.recommendations(&["Unlisted Title 7f3a".to_string()], 3);
    while let Some(item) = stream.next().await {
        item.unwrap();
    }

    let line = capture.find("Unlisted Title 7f3a").unwrap();
    assert!(line.contains("recommendations_with"), "{line}");
    assert!(line.contains("strategy=sequentialloop"), "{line}");
}
