//! Ticker Bar — a borderless, always-visible bar that scrolls stock quotes.
//!
//! It reads a watchlist from `tickers.json` in the per-user data directory,
//! polls a price source on a background thread every 30 seconds, and scrolls
//! colored `SYMBOL: $PRICE (+CHANGE%)` segments across the bar.
//!
//! Usage example (CLI):
//! ```bash
//! ticker_bar --simulate --scroll-speed 1.0
//! ticker_bar --simulate --simulate-failure-rate 0.2
//! RUST_LOG=debug ticker_bar --data-dir ./ticker-data
//! ```
//!
//! The bar controls (close, lock, settings) sit at its right edge. Unlock it to
//! drag it around; the settings menu opens the watchlist editor and the size
//! dialog.
#![warn(missing_docs)]
mod app;
mod args;
mod dialogs;
mod placement;

use std::time::Duration;

use clap::Parser;
use log::{error, info, warn};
use ticker_core::paths::{self, DataFiles};
use ticker_core::settings::BarSettings;
use ticker_core::{Result, TickerError};
use ticker_source::{FeedHandle, FeedWorker, SimulatedSource, YahooSource};

use crate::app::TickerBarApp;
use crate::args::Args;

fn main() -> Result<(), TickerError> {
    init_logger();
    let args = Args::parse();

    let data_dir = paths::ensure_data_dir(args.data_dir.as_deref())?;
    info!("Data directory: {}", data_dir.display());
    let files = DataFiles::in_dir(&data_dir);
    let settings = BarSettings::load_or_default(&files.settings);

    let feed = start_feed(&args, &files)?;
    let scroll_speed = args.scroll_speed;

    let options = eframe::NativeOptions {
        viewport: placement::root_viewport(&settings),
        ..Default::default()
    };

    eframe::run_native(
        "Ticker",
        options,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            if let Err(e) = ctrlc::set_handler(move || {
                info!("Ctrl+C received. Closing the bar...");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                ctx.request_repaint();
            }) {
                warn!("Ctrl+C handler not installed: {}", e);
            }
            Box::new(TickerBarApp::new(&cc.egui_ctx, feed, files, settings, scroll_speed))
        }),
    )
    .map_err(|e| {
        error!("Window error: {}", e);
        TickerError::Ui(e.to_string())
    })
}

fn start_feed(args: &Args, files: &DataFiles) -> Result<FeedHandle> {
    let refresh_every = Duration::from_secs(args.refresh_secs);
    let watchlist = files.watchlist.clone();
    if args.simulate {
        info!("Using simulated prices (failure rate {})", args.simulate_failure_rate);
        let source = SimulatedSource::new().with_failure_rate(args.simulate_failure_rate);
        FeedWorker::start(source, watchlist, refresh_every)
    } else {
        FeedWorker::start(YahooSource::new()?, watchlist, refresh_every)
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
