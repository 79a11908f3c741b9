//! Refresh controller: debounced, single-flight acquisition driven by
//! asset/timeframe commands.
//!
//! The controller runs as one spawned task owning all mutable feed state.
//! Commands bump a generation counter and arm a debounce timer; when the
//! timer fires a refresh task is spawned carrying the generation current at
//! that moment. A completion whose generation no longer matches is discarded,
//! so a superseded refresh can never overwrite the result of a later one,
//! regardless of completion order.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::api::{ApiResult, CoinGeckoClient};
use crate::feed::orchestrator::{self, MarketSnapshot, DEFAULT_INTER_CALL_SPACING};
use crate::feed::state::{FeedState, FeedStatus};
use crate::shared::{Asset, Timeframe};

/// Default settling window for rapid parameter changes.
const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(1);

/// Feed controller configuration.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Initially selected asset.
    pub initial_asset: Asset,
    /// Initially selected timeframe.
    pub initial_timeframe: Timeframe,
    /// Settling window: a refresh fires only after parameters stop changing
    /// for this long. The initial refresh and manual refreshes skip it.
    pub debounce: Duration,
    /// Pause between the metadata and chart calls of one refresh.
    pub inter_call_spacing: Duration,
    /// Probe `GET /ping` before the first refresh; on failure the feed goes
    /// straight to `Error` without spending retry budget on data calls.
    pub probe_on_start: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            initial_asset: Asset::default(),
            initial_timeframe: Timeframe::default(),
            debounce: DEFAULT_DEBOUNCE,
            inter_call_spacing: DEFAULT_INTER_CALL_SPACING,
            probe_on_start: true,
        }
    }
}

/// Commands accepted by the controller task.
#[derive(Debug)]
enum Command {
    SetAsset(Asset),
    SetTimeframe(Timeframe),
    Refresh,
    Shutdown,
}

/// Completion notice from a spawned refresh task.
struct RefreshOutcome {
    generation: u64,
    result: ApiResult<MarketSnapshot>,
}

/// Handle to a running price feed.
///
/// Dropping the handle without calling [`PriceFeed::shutdown`] closes the
/// command channel and ends the controller task.
///
/// # Example
///
/// ```rust,ignore
/// use coinfeed::api::CoinGeckoClient;
/// use coinfeed::feed::{FeedConfig, PriceFeed};
/// use coinfeed::shared::{Asset, Timeframe};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = CoinGeckoClient::new(coinfeed::network::DEFAULT_API_URL)?;
///     let feed = PriceFeed::spawn(client, FeedConfig::default());
///
///     let mut state = feed.state();
///     feed.set_asset(Asset::new("ETH", "ethereum")).await;
///     while state.changed().await.is_ok() {
///         let snapshot = state.borrow().clone();
///         println!("{:?} {:?}", snapshot.status, snapshot.quote);
///     }
///     Ok(())
/// }
/// ```
pub struct PriceFeed {
    cmd_tx: mpsc::Sender<Command>,
    state_rx: watch::Receiver<FeedState>,
    task: tokio::task::JoinHandle<()>,
}

impl PriceFeed {
    /// Start the controller task. Must be called within a tokio runtime.
    pub fn spawn(client: CoinGeckoClient, config: FeedConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let initial = FeedState::new(config.initial_asset.clone(), config.initial_timeframe);
        let (state_tx, state_rx) = watch::channel(initial);
        let task = tokio::spawn(run(client, config, cmd_rx, state_tx));
        Self {
            cmd_tx,
            state_rx,
            task,
        }
    }

    /// Subscribe to state updates.
    pub fn state(&self) -> watch::Receiver<FeedState> {
        self.state_rx.clone()
    }

    /// Clone of the current state.
    pub fn current(&self) -> FeedState {
        self.state_rx.borrow().clone()
    }

    /// Select a different asset. A no-op if it matches the current one.
    pub async fn set_asset(&self, asset: Asset) {
        self.send(Command::SetAsset(asset)).await;
    }

    /// Select a different timeframe. A no-op if it matches the current one.
    pub async fn set_timeframe(&self, timeframe: Timeframe) {
        self.send(Command::SetTimeframe(timeframe)).await;
    }

    /// Force a refresh of the current selection, bypassing the debounce.
    pub async fn refresh(&self) {
        self.send(Command::Refresh).await;
    }

    /// Stop the controller task and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.cmd_tx.send(Command::Shutdown).await;
        let _ = self.task.await;
    }

    async fn send(&self, command: Command) {
        if self.cmd_tx.send(command).await.is_err() {
            tracing::warn!("feed controller task is gone, command dropped");
        }
    }
}

/// Controller task body. Sole owner of the selection, the generation
/// counter, and the published state.
async fn run(
    client: CoinGeckoClient,
    config: FeedConfig,
    mut cmd_rx: mpsc::Receiver<Command>,
    state_tx: watch::Sender<FeedState>,
) {
    let mut asset = config.initial_asset.clone();
    let mut timeframe = config.initial_timeframe;
    let mut generation: u64 = 0;
    let mut deadline: Option<Instant> = None;

    let (done_tx, mut done_rx) = mpsc::channel::<RefreshOutcome>(8);

    if config.probe_on_start {
        match client.ping().await {
            Ok(()) => deadline = Some(Instant::now()),
            Err(err) => {
                tracing::warn!(error = %err, "liveness probe failed, skipping initial refresh");
                publish_failure(&state_tx, err.user_message());
            }
        }
    } else {
        deadline = Some(Instant::now());
    }

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(Command::SetAsset(next)) => {
                    if next != asset {
                        asset = next;
                        generation += 1;
                        deadline = Some(Instant::now() + config.debounce);
                    }
                }
                Some(Command::SetTimeframe(next)) => {
                    if next != timeframe {
                        timeframe = next;
                        generation += 1;
                        deadline = Some(Instant::now() + config.debounce);
                    }
                }
                Some(Command::Refresh) => {
                    generation += 1;
                    deadline = Some(Instant::now());
                }
                Some(Command::Shutdown) | None => break,
            },
            () = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                deadline = None;
                let current = generation;
                state_tx.send_modify(|state| {
                    state.status = FeedStatus::Fetching;
                    state.asset = asset.clone();
                    state.timeframe = timeframe;
                    state.error = None;
                });
                spawn_refresh(
                    &client,
                    &asset,
                    &timeframe,
                    config.inter_call_spacing,
                    current,
                    done_tx.clone(),
                );
            },
            Some(outcome) = done_rx.recv() => {
                if outcome.generation != generation {
                    tracing::debug!(
                        completed = outcome.generation,
                        current = generation,
                        "discarding superseded refresh result"
                    );
                    continue;
                }
                match outcome.result {
                    Ok(snapshot) => {
                        tracing::debug!(
                            asset = %asset.id,
                            points = snapshot.series.len(),
                            "refresh committed"
                        );
                        state_tx.send_modify(|state| {
                            state.status = FeedStatus::Idle;
                            state.quote = Some(snapshot.quote);
                            state.series = snapshot.series;
                            state.error = None;
                            state.last_updated = Some(chrono::Utc::now());
                        });
                    }
                    Err(err) => {
                        tracing::warn!(asset = %asset.id, error = %err, "refresh failed");
                        publish_failure(&state_tx, err.user_message());
                    }
                }
            },
        }
    }

    tracing::debug!("feed controller task stopped");
}

/// Run one refresh off the controller task so new commands keep flowing
/// while it is in flight.
fn spawn_refresh(
    client: &CoinGeckoClient,
    asset: &Asset,
    timeframe: &Timeframe,
    spacing: Duration,
    generation: u64,
    done_tx: mpsc::Sender<RefreshOutcome>,
) {
    let client = client.clone();
    let asset = asset.clone();
    let timeframe = *timeframe;
    tokio::spawn(async move {
        let result = orchestrator::fetch_snapshot(&client, &asset, &timeframe, spacing).await;
        let _ = done_tx.send(RefreshOutcome { generation, result }).await;
    });
}

/// Enter the error state: quote and series are cleared together so no
/// mismatched pair can ever be observed.
fn publish_failure(state_tx: &watch::Sender<FeedState>, message: String) {
    state_tx.send_modify(|state| {
        state.status = FeedStatus::Error;
        state.quote = None;
        state.series = Vec::new();
        state.error = Some(message);
    });
}
