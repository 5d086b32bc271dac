//! Background feed worker.
//!
//! The `FeedWorker` thread owns a `QuoteFeed` and keeps the network off the UI
//! thread. The UI talks to it through a `FeedHandle`:
//!
//! - `FeedCommand::Reload` — re-read the watchlist file, rebuild the
//!   previous-close cache, refresh prices and restart the refresh timer.
//! - `FeedCommand::Refresh` — refresh prices now.
//! - `FeedCommand::Shutdown` — stop the thread.
//!
//! Every refresh publishes a `FeedEvent::Quotes` with the display items. The
//! refresh timer is a `crossbeam_channel::tick` multiplexed with the command
//! channel via `select!`.
//!
//! Concurrency and shutdown:
//! - The worker issues a `Reload` for itself when it starts.
//! - Dropping the `FeedHandle` sends `Shutdown`; a closed event channel also
//!   stops the worker after its next refresh.
//! - A fetch in flight is not interrupted; shutdown takes effect afterwards.
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, Local};
use crossbeam_channel::{Receiver, Sender, TryIter, select, tick, unbounded};
use log::{debug, error, info};
use ticker_core::error::{Result, TickerError};
use ticker_core::feed::{FeedItem, PriceSource, QuoteFeed};
use ticker_core::watchlist::Watchlist;

/// Command sent from the UI to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedCommand {
    /// Re-read the watchlist, refresh closes, then prices.
    Reload,
    /// Refresh prices for the current watchlist.
    Refresh,
    /// Stop the worker.
    Shutdown,
}

/// Result of one refresh cycle.
#[derive(Debug, Clone)]
pub struct QuoteUpdate {
    /// Display items in watchlist order.
    pub items: Vec<FeedItem>,
    /// Number of symbols in the watchlist at fetch time.
    pub symbols: usize,
    /// Local time the refresh finished.
    pub fetched_at: DateTime<Local>,
}

/// Message sent by the worker to the UI.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// Fresh display items.
    Quotes(QuoteUpdate),
}

/// UI-side handle to a running worker.
pub struct FeedHandle {
    commands: Sender<FeedCommand>,
    events: Receiver<FeedEvent>,
    thread: Option<JoinHandle<()>>,
}

impl FeedHandle {
    /// Ask the worker to reload the watchlist.
    pub fn reload(&self) -> Result<()> {
        self.send(FeedCommand::Reload)
    }

    /// Ask the worker for an immediate price refresh.
    pub fn refresh(&self) -> Result<()> {
        self.send(FeedCommand::Refresh)
    }

    fn send(&self, command: FeedCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|e| TickerError::ChannelSend(format!("{:?}: {}", command, e)))
    }

    /// Drain pending events without blocking.
    pub fn try_events(&self) -> TryIter<'_, FeedEvent> {
        self.events.try_iter()
    }

    /// Block up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<FeedEvent> {
        self.events
            .recv_timeout(timeout)
            .map_err(|e| TickerError::ChannelRecv(e.to_string()))
    }

    /// Stop the worker and wait for its thread to finish.
    pub fn join(mut self) {
        let _ = self.commands.send(FeedCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Feed worker panicked");
            }
        }
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        let _ = self.commands.send(FeedCommand::Shutdown);
    }
}

/// Background thread driving a `QuoteFeed`.
pub struct FeedWorker;

impl FeedWorker {
    /// Start the worker thread.
    ///
    /// - source: price source moved into the thread.
    /// - watchlist_path: JSON watchlist re-read on every reload.
    /// - refresh_every: interval between automatic price refreshes.
    pub fn start<S>(source: S, watchlist_path: PathBuf, refresh_every: Duration) -> Result<FeedHandle>
    where
        S: PriceSource + Send + 'static,
    {
        let (command_tx, command_rx) = unbounded::<FeedCommand>();
        let (event_tx, event_rx) = unbounded::<FeedEvent>();

        let thread = thread::Builder::new()
            .name("feed-worker".into())
            .spawn(move || run(QuoteFeed::new(source), watchlist_path, refresh_every, command_rx, event_tx))?;

        command_tx
            .send(FeedCommand::Reload)
            .map_err(|e| TickerError::ChannelSend(e.to_string()))?;

        Ok(FeedHandle {
            commands: command_tx,
            events: event_rx,
            thread: Some(thread),
        })
    }
}

fn run<S: PriceSource>(
    mut feed: QuoteFeed<S>,
    watchlist_path: PathBuf,
    refresh_every: Duration,
    commands: Receiver<FeedCommand>,
    events: Sender<FeedEvent>,
) {
    info!("Feed worker started (refresh every {:?})", refresh_every);
    let mut timer = tick(refresh_every);

    loop {
        let mut restart_timer = false;
        select! {
            recv(commands) -> msg => match msg {
                Ok(FeedCommand::Reload) => {
                    let watchlist = Watchlist::load_or_default(&watchlist_path);
                    info!("Reloading watchlist: {} symbols", watchlist.len());
                    feed.reload(watchlist.into_symbols());
                    restart_timer = true;
                    if !publish(&mut feed, &events) {
                        break;
                    }
                }
                Ok(FeedCommand::Refresh) => {
                    if !publish(&mut feed, &events) {
                        break;
                    }
                }
                Ok(FeedCommand::Shutdown) | Err(_) => break,
            },
            recv(timer) -> _ => {
                if !publish(&mut feed, &events) {
                    break;
                }
            }
        }
        if restart_timer {
            timer = tick(refresh_every);
        }
    }
    info!("Feed worker stopping...");
}

/// Refresh and send the items; `false` once the UI side is gone.
fn publish<S: PriceSource>(feed: &mut QuoteFeed<S>, events: &Sender<FeedEvent>) -> bool {
    let items = feed.refresh();
    debug!("Refreshed {} items", items.len());
    let update = QuoteUpdate {
        items,
        symbols: feed.symbols().len(),
        fetched_at: Local::now(),
    };
    events.send(FeedEvent::Quotes(update)).is_ok()
}
