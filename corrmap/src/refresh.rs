//! Serialized refresh task
//!
//! One tokio task owns the lookback window and recomputes the whole pipeline
//! on a fixed interval, on manual request, and whenever the window changes.
//! Because a single task consumes every trigger, at most one recomputation is
//! in flight. Results are published wholesale through a `watch` channel.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tokio::{
    sync::{
        mpsc::{self, error::TrySendError},
        watch,
    },
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::{debug, error, info, warn};

use crate::{
    config::DashboardConfig,
    error::{RefreshError, SourceError},
    model::{CorrelationMatrix, SeriesBySymbol},
    source::{PriceSource, fetch_all},
    statistics::build_correlation_matrix,
    window::TimeWindow,
};

/// Pending requests beyond this are rejected with [`RefreshError::Busy`]
pub const REQUEST_QUEUE_CAPACITY: usize = 16;

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Snapshot {
    pub window: TimeWindow,
    pub series: SeriesBySymbol,
    pub matrix: CorrelationMatrix,
    /// Wall clock time of computation (epoch ms)
    pub computed_at_ms: i64,
}

/// Latest state published by the refresh task
#[derive(Debug, Clone)]
pub enum RefreshStatus {
    Loading,
    Ready(Arc<Snapshot>),
    Failed(String),
}

/// Requests accepted by the refresh task
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshRequest {
    Manual,
    SetWindow(TimeWindow),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshTrigger {
    Timer,
    Manual,
    WindowChanged,
}

/// Fetch every symbol and build the statistics and correlation matrix
pub async fn run_pipeline<S>(source: &S, symbols: &[SmolStr], window: &TimeWindow) -> Snapshot
where
    S: PriceSource + ?Sized,
{
    let series = fetch_all(source, symbols, window).await;
    let matrix = build_correlation_matrix(&series);
    Snapshot {
        window: window.clone(),
        series,
        matrix,
        computed_at_ms: Utc::now().timestamp_millis(),
    }
}

/// Handle to a running refresh task
pub struct Refresher {
    request_tx: mpsc::Sender<RefreshRequest>,
    status_rx: watch::Receiver<RefreshStatus>,
    handle: JoinHandle<()>,
}

impl Refresher {
    /// Request an immediate recomputation without waiting for queue space
    pub fn refresh(&self) -> Result<(), RefreshError> {
        self.send(RefreshRequest::Manual)
    }

    /// Switch lookback window; triggers a recomputation and restarts the timer
    pub fn set_window(&self, window: TimeWindow) -> Result<(), RefreshError> {
        self.send(RefreshRequest::SetWindow(window))
    }

    fn send(&self, request: RefreshRequest) -> Result<(), RefreshError> {
        self.request_tx.try_send(request).map_err(|error| match error {
            TrySendError::Full(_) => RefreshError::Busy,
            TrySendError::Closed(_) => RefreshError::Closed,
        })
    }

    /// New receiver observing every published status
    pub fn subscribe(&self) -> watch::Receiver<RefreshStatus> {
        self.status_rx.clone()
    }

    /// Stop the task after any in-flight recomputation completes
    pub async fn shutdown(self) {
        let Self {
            request_tx, handle, ..
        } = self;
        drop(request_tx);
        if let Err(error) = handle.await {
            warn!(%error, "refresh task did not shut down cleanly");
        }
    }
}

/// Spawn the refresh task. The first recomputation starts immediately.
///
/// With no configured symbols, the source is asked for its symbol list on the
/// first trigger (and again on later triggers until that succeeds).
pub fn spawn_refresher(source: Arc<dyn PriceSource>, config: &DashboardConfig) -> Refresher {
    let (request_tx, request_rx) = mpsc::channel(REQUEST_QUEUE_CAPACITY);
    let (status_tx, status_rx) = watch::channel(RefreshStatus::Loading);

    let handle = tokio::spawn(run_refresh_loop(
        source,
        config.symbols.clone(),
        config.window.clone(),
        config.refresh_interval.max(Duration::from_millis(1)),
        request_rx,
        status_tx,
    ));

    Refresher {
        request_tx,
        status_rx,
        handle,
    }
}

/// Log a failed symbol lookup and describe it for the dashboard
fn symbol_lookup_failure(err: &SourceError) -> String {
    if err.is_transient() {
        warn!(error = %err, "failed to fetch available symbols, retrying on next refresh");
        format!("Symbol lookup failed: {err} (retrying)")
    } else {
        error!(error = %err, "price source rejected the symbol lookup");
        format!("Symbol lookup failed: {err}")
    }
}

async fn run_refresh_loop(
    source: Arc<dyn PriceSource>,
    mut symbols: Vec<SmolStr>,
    mut window: TimeWindow,
    refresh_interval: Duration,
    mut request_rx: mpsc::Receiver<RefreshRequest>,
    status_tx: watch::Sender<RefreshStatus>,
) {
    info!(window = %window, ?refresh_interval, "starting refresh task");

    let mut ticker = tokio::time::interval(refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let trigger = tokio::select! {
            _ = ticker.tick() => RefreshTrigger::Timer,
            request = request_rx.recv() => match request {
                Some(RefreshRequest::Manual) => RefreshTrigger::Manual,
                Some(RefreshRequest::SetWindow(new_window)) => {
                    window = new_window;
                    ticker.reset();
                    RefreshTrigger::WindowChanged
                }
                None => {
                    debug!("refresh handle dropped");
                    break;
                }
            },
        };

        status_tx.send_replace(RefreshStatus::Loading);

        if symbols.is_empty() {
            match source.available_symbols().await {
                Ok(available) => symbols = available,
                Err(err) => {
                    status_tx.send_replace(RefreshStatus::Failed(symbol_lookup_failure(&err)));
                    continue;
                }
            }
        }

        let snapshot = run_pipeline(source.as_ref(), &symbols, &window).await;
        info!(
            ?trigger,
            window = %window,
            symbols = snapshot.matrix.len(),
            "refreshed correlation matrix"
        );
        status_tx.send_replace(RefreshStatus::Ready(Arc::new(snapshot)));
    }

    info!("refresh task stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::Series,
        source::{Clock, MockPriceSource},
    };
    use async_trait::async_trait;

    fn mock() -> Arc<dyn PriceSource> {
        Arc::new(
            MockPriceSource::new()
                .with_seed(1)
                .with_clock(Clock::Fixed(1_700_000_000_000)),
        )
    }

    async fn next_ready(
        rx: &mut watch::Receiver<RefreshStatus>,
        accept: impl Fn(&Snapshot) -> bool,
    ) -> Arc<Snapshot> {
        let status = rx
            .wait_for(|status| matches!(status, RefreshStatus::Ready(s) if accept(s.as_ref())))
            .await
            .unwrap();
        match &*status {
            RefreshStatus::Ready(snapshot) => Arc::clone(snapshot),
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_run_pipeline() {
        let symbols: Vec<SmolStr> = vec!["AAPL".into(), "TSLA".into()];
        let snapshot = run_pipeline(mock().as_ref(), &symbols, &TimeWindow::default()).await;

        assert_eq!(snapshot.window.minutes, 5);
        assert_eq!(snapshot.series.len(), 2);
        assert_eq!(snapshot.matrix.symbols, vec!["AAPL", "TSLA"]);
        assert_eq!(snapshot.matrix.correlations[0][0], 1.0);
    }

    #[tokio::test]
    async fn test_startup_refresh_uses_available_symbols() {
        let refresher = spawn_refresher(mock(), &DashboardConfig::default());
        let mut rx = refresher.subscribe();

        let snapshot = next_ready(&mut rx, |_| true).await;
        assert_eq!(snapshot.matrix.len(), 8);
        assert_eq!(snapshot.matrix.symbols[0], "AAPL");
        assert!(snapshot.series.values().all(|s| s.len() == 30));

        refresher.shutdown().await;
    }

    #[tokio::test]
    async fn test_configured_symbols_and_window_change() {
        let config = DashboardConfig::default().with_symbols(["NVDA", "JPM"]);
        let refresher = spawn_refresher(mock(), &config);
        let mut rx = refresher.subscribe();

        let first = next_ready(&mut rx, |_| true).await;
        assert_eq!(first.matrix.symbols, vec!["NVDA", "JPM"]);

        refresher.set_window(TimeWindow::from_minutes(15)).unwrap();
        let second = next_ready(&mut rx, |s| s.window.minutes == 15).await;
        assert!(second.series.values().all(|s| s.len() == 90));

        refresher.shutdown().await;
    }

    #[tokio::test]
    async fn test_manual_refresh_replaces_snapshot() {
        let refresher = spawn_refresher(mock(), &DashboardConfig::default().with_symbols(["AAPL"]));
        let mut rx = refresher.subscribe();

        let first = next_ready(&mut rx, |_| true).await;
        refresher.refresh().unwrap();
        let second = next_ready(&mut rx, |s| !std::ptr::eq(s, first.as_ref())).await;

        assert!(!Arc::ptr_eq(&first, &second));
        // Fresh random samples on the same grid
        assert_ne!(first.series["AAPL"], second.series["AAPL"]);

        refresher.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_triggers_refresh() {
        let config = DashboardConfig::default()
            .with_symbols(["AAPL"])
            .with_refresh_interval(Duration::from_secs(60));
        let refresher = spawn_refresher(mock(), &config);
        let mut rx = refresher.subscribe();

        let first = next_ready(&mut rx, |_| true).await;
        // Paused clock auto-advances to the next tick
        let second = next_ready(&mut rx, |s| !std::ptr::eq(s, first.as_ref())).await;
        assert_eq!(second.matrix.symbols, vec!["AAPL"]);

        refresher.shutdown().await;
    }

    /// Fails every symbol lookup with the wrapped error
    struct NoSymbols(SourceError);

    #[async_trait]
    impl PriceSource for NoSymbols {
        async fn available_symbols(&self) -> Result<Vec<SmolStr>, SourceError> {
            Err(self.0.clone())
        }

        async fn fetch_series(&self, _: &str, _: &TimeWindow) -> Result<Series, SourceError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_symbol_lookup_failure_is_reported() {
        let offline = NoSymbols(SourceError::Unavailable("offline".to_string()));
        let refresher = spawn_refresher(Arc::new(offline), &DashboardConfig::default());
        let mut rx = refresher.subscribe();

        let status = rx
            .wait_for(|status| matches!(status, RefreshStatus::Failed(_)))
            .await
            .unwrap()
            .clone();
        match status {
            RefreshStatus::Failed(message) => {
                assert!(message.contains("offline"));
                assert!(message.ends_with("(retrying)"));
            }
            other => panic!("unexpected status: {:?}", other),
        }

        refresher.shutdown().await;
    }

    #[test]
    fn test_symbol_lookup_failure_message() {
        struct TestCase {
            input: SourceError,
            expected: &'static str,
        }

        let tests = vec![
            TestCase {
                // TC0: transient failures are retried on the next trigger
                input: SourceError::Unavailable("timed out".to_string()),
                expected: "Symbol lookup failed: price source unavailable: timed out (retrying)",
            },
            TestCase {
                // TC1: rejected lookups are reported without a retry hint
                input: SourceError::UnknownSymbol("*".into()),
                expected: "Symbol lookup failed: unknown symbol: *",
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = symbol_lookup_failure(&test.input);
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[tokio::test]
    async fn test_requests_after_task_stopped() {
        let refresher = spawn_refresher(mock(), &DashboardConfig::default());
        refresher.handle.abort();
        while !refresher.handle.is_finished() {
            tokio::task::yield_now().await;
        }

        assert_eq!(refresher.refresh(), Err(RefreshError::Closed));
        assert_eq!(
            refresher.set_window(TimeWindow::default()),
            Err(RefreshError::Closed)
        );
    }

    /// Never answers the symbol lookup, so queued requests are never drained
    struct Stalled;

    #[async_trait]
    impl PriceSource for Stalled {
        async fn available_symbols(&self) -> Result<Vec<SmolStr>, SourceError> {
            std::future::pending().await
        }

        async fn fetch_series(&self, _: &str, _: &TimeWindow) -> Result<Series, SourceError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_requests_rejected_when_queue_full() {
        let refresher = spawn_refresher(Arc::new(Stalled), &DashboardConfig::default());
        // Let the task park in the first symbol lookup
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        for _ in 0..REQUEST_QUEUE_CAPACITY {
            assert_eq!(refresher.refresh(), Ok(()));
        }
        assert_eq!(refresher.refresh(), Err(RefreshError::Busy));
        assert_eq!(
            refresher.set_window(TimeWindow::from_minutes(15)),
            Err(RefreshError::Busy)
        );

        refresher.handle.abort();
    }
}
