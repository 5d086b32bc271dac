//! Command-line arguments for the ticker bar.
//!
//! Every flag is optional; without flags the bar reads its files from the
//! per-user data directory and polls Yahoo Finance every 30 seconds.
use std::path::PathBuf;

use clap::Parser;
use ticker_core::feed::REFRESH_INTERVAL;
use ticker_core::marquee::DEFAULT_SCROLL_SPEED;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Scrolling stock ticker bar", long_about = None)]
pub struct Args {
    /// Directory holding tickers.json and settings.json.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Use simulated random-walk prices instead of Yahoo Finance.
    #[arg(long)]
    pub simulate: bool,

    /// Fraction of simulated symbols that come back without data (0 to 1).
    #[arg(long, default_value_t = 0.0, requires = "simulate", value_parser = parse_rate)]
    pub simulate_failure_rate: f64,

    /// Horizontal scroll speed in pixels per 15 ms tick.
    #[arg(long, default_value_t = DEFAULT_SCROLL_SPEED, value_parser = parse_speed)]
    pub scroll_speed: f32,

    /// Seconds between price refreshes.
    #[arg(long, default_value_t = REFRESH_INTERVAL.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    pub refresh_secs: u64,
}

fn parse_speed(raw: &str) -> Result<f32, String> {
    let speed: f32 = raw.trim().parse().map_err(|e| format!("{}", e))?;
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err(format!("scroll speed must be a positive number, got {}", raw))
    }
}

fn parse_rate(raw: &str) -> Result<f64, String> {
    let rate: f64 = raw.trim().parse().map_err(|e| format!("{}", e))?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(format!("failure rate must be between 0 and 1, got {}", raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_cadence() {
        let args = Args::try_parse_from(["ticker_bar"]).unwrap();
        assert_eq!(args.data_dir, None);
        assert!(!args.simulate);
        assert_eq!(args.simulate_failure_rate, 0.0);
        assert_eq!(args.scroll_speed, 0.5);
        assert_eq!(args.refresh_secs, 30);
    }

    #[test]
    fn flags_are_parsed() {
        let args = Args::try_parse_from([
            "ticker_bar",
            "--data-dir",
            "/tmp/ticker",
            "--simulate",
            "--scroll-speed",
            "1.5",
            "--refresh-secs",
            "5",
        ])
        .unwrap();
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/ticker")));
        assert!(args.simulate);
        assert_eq!(args.scroll_speed, 1.5);
        assert_eq!(args.refresh_secs, 5);
    }

    #[test]
    fn failure_rate_needs_simulation_and_a_fraction() {
        let args =
            Args::try_parse_from(["ticker_bar", "--simulate", "--simulate-failure-rate", "0.25"])
                .unwrap();
        assert_eq!(args.simulate_failure_rate, 0.25);
        assert!(Args::try_parse_from(["ticker_bar", "--simulate-failure-rate", "0.25"]).is_err());
        assert!(
            Args::try_parse_from(["ticker_bar", "--simulate", "--simulate-failure-rate", "1.5"])
                .is_err()
        );
    }

    #[test]
    fn rejects_non_positive_values() {
        assert!(Args::try_parse_from(["ticker_bar", "--scroll-speed", "0"]).is_err());
        assert!(Args::try_parse_from(["ticker_bar", "--scroll-speed", "fast"]).is_err());
        assert!(Args::try_parse_from(["ticker_bar", "--refresh-secs", "0"]).is_err());
    }
}
