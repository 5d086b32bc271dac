//! Yahoo Finance price source.
//!
//! Two endpoints are used:
//! - `/v7/finance/spark?symbols=A,B&range=1d&interval=1m` — one request for the
//!   intraday close series of the whole watchlist.
//! - `/v8/finance/chart/{symbol}?range=1d&interval=1d` — per-symbol metadata
//!   carrying the previous session close.
//!
//! Response decoding lives in free functions over `serde_json::Value` so it can
//! be exercised without the network.
use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde_json::Value;
use ticker_core::error::{Result, TickerError};
use ticker_core::feed::{PriceBatch, PriceSource};
use ticker_core::symbol::Symbol;

/// Public Yahoo Finance API host.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Yahoo rejects requests without a browser-like user agent.
const USER_AGENT: &str = "Mozilla/5.0";

/// Blocking HTTP client for Yahoo Finance.
pub struct YahooSource {
    client: Client,
    base_url: String,
}

impl YahooSource {
    /// Create a source talking to the public API.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a source talking to another host (e.g., a local mirror).
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TickerError::Fetch(format!("HTTP client setup: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        debug!("GET {} {:?}", url, query);
        self.client
            .get(url)
            .query(query)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json::<Value>())
            .map_err(|e| TickerError::Fetch(e.to_string()))
    }
}

impl PriceSource for YahooSource {
    fn fetch_last(&mut self, symbols: &[Symbol]) -> Result<PriceBatch> {
        let joined = symbols
            .iter()
            .map(Symbol::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}/v7/finance/spark", self.base_url);
        let body = self.get_json(
            &url,
            &[("symbols", joined.as_str()), ("range", "1d"), ("interval", "1m")],
        )?;
        parse_spark(&body)
    }

    fn fetch_previous_close(&mut self, symbol: &Symbol) -> Result<Option<f64>> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let body = self.get_json(&url, &[("range", "1d"), ("interval", "1d")])?;
        parse_previous_close(&body)
    }
}

fn series(values: Option<&Value>) -> Vec<Option<f64>> {
    values
        .and_then(Value::as_array)
        .map(|array| array.iter().map(Value::as_f64).collect())
        .unwrap_or_default()
}

fn api_error(body: &Value, root: &str) -> Option<String> {
    body[root]["error"]
        .as_object()
        .map(|error| match error.get("description").and_then(Value::as_str) {
            Some(description) => description.to_string(),
            None => Value::Object(error.clone()).to_string(),
        })
}

/// Decode a spark response into per-symbol close series.
///
/// Accepts both the `{"spark": {"result": [...]}}` layout and the flat
/// `{"AAPL": {"close": [...]}}` layout. Entries whose symbol does not parse
/// are skipped; their symbols then render as unavailable.
pub fn parse_spark(body: &Value) -> Result<PriceBatch> {
    if let Some(message) = api_error(body, "spark").or_else(|| api_error(body, "finance")) {
        return Err(TickerError::Fetch(message));
    }

    let mut batch = PriceBatch::new();
    if let Some(results) = body["spark"]["result"].as_array() {
        for entry in results {
            let Some(symbol) = entry["symbol"].as_str().and_then(|s| Symbol::parse(s).ok()) else {
                continue;
            };
            let close = series(entry["response"][0]["indicators"]["quote"][0].get("close"));
            batch.insert(symbol, close);
        }
        return Ok(batch);
    }

    let Some(flat) = body.as_object() else {
        return Err(TickerError::MissingData("spark result".into()));
    };
    for (key, entry) in flat {
        if !entry.is_object() {
            continue;
        }
        let Ok(symbol) = Symbol::parse(key) else {
            continue;
        };
        batch.insert(symbol, series(entry.get("close")));
    }
    if batch.is_empty() && !flat.is_empty() {
        return Err(TickerError::MissingData("spark result".into()));
    }
    Ok(batch)
}

/// Decode the previous close from a chart response.
///
/// Prefers `meta.previousClose` and falls back to `meta.chartPreviousClose`.
pub fn parse_previous_close(body: &Value) -> Result<Option<f64>> {
    if let Some(message) = api_error(body, "chart") {
        return Err(TickerError::Fetch(message));
    }
    let meta = &body["chart"]["result"][0]["meta"];
    if meta.is_null() {
        return Err(TickerError::MissingData("chart meta".into()));
    }
    Ok(meta["previousClose"]
        .as_f64()
        .or_else(|| meta["chartPreviousClose"].as_f64()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sym(s: &str) -> Symbol {
        Symbol::parse(s).unwrap()
    }

    #[test]
    fn spark_result_layout_is_decoded() {
        let body = json!({
            "spark": {
                "result": [
                    {
                        "symbol": "AAPL",
                        "response": [{
                            "meta": { "symbol": "AAPL" },
                            "timestamp": [1, 2, 3],
                            "indicators": { "quote": [{ "close": [189.5, null, 190.25] }] }
                        }]
                    },
                    { "symbol": "ZZZZ", "response": [] }
                ],
                "error": null
            }
        });
        let batch = parse_spark(&body).unwrap();
        assert_eq!(batch[&sym("AAPL")], vec![Some(189.5), None, Some(190.25)]);
        assert!(batch[&sym("ZZZZ")].is_empty());
    }

    #[test]
    fn flat_layout_is_decoded() {
        let body = json!({
            "MSFT": { "symbol": "MSFT", "timestamp": [1, 2], "close": [410.0, 411.5] },
            "BRK-B": { "symbol": "BRK-B", "close": null }
        });
        let batch = parse_spark(&body).unwrap();
        assert_eq!(batch[&sym("MSFT")], vec![Some(410.0), Some(411.5)]);
        assert!(batch[&sym("BRK-B")].is_empty());
    }

    #[test]
    fn api_error_fails_the_whole_batch() {
        let body = json!({
            "spark": { "result": null, "error": { "code": "Bad Request", "description": "Missing value for the \"symbols\" argument" } }
        });
        let err = parse_spark(&body).unwrap_err();
        assert!(matches!(err, TickerError::Fetch(msg) if msg.contains("symbols")));

        let finance = json!({ "finance": { "result": null, "error": { "code": "Unauthorized" } } });
        assert!(matches!(parse_spark(&finance), Err(TickerError::Fetch(_))));
    }

    #[test]
    fn unexpected_document_is_missing_data() {
        assert!(matches!(parse_spark(&json!([1, 2])), Err(TickerError::MissingData(_))));
        assert!(matches!(parse_spark(&json!({ "x": 1 })), Err(TickerError::MissingData(_))));
    }

    #[test]
    fn previous_close_prefers_previous_close_field() {
        let body = json!({ "chart": { "result": [{ "meta": { "previousClose": 100.0, "chartPreviousClose": 99.0 } }], "error": null } });
        assert_eq!(parse_previous_close(&body).unwrap(), Some(100.0));

        let fallback = json!({ "chart": { "result": [{ "meta": { "chartPreviousClose": 99.0 } }] } });
        assert_eq!(parse_previous_close(&fallback).unwrap(), Some(99.0));

        let absent = json!({ "chart": { "result": [{ "meta": { "currency": "USD" } }] } });
        assert_eq!(parse_previous_close(&absent).unwrap(), None);
    }

    #[test]
    fn previous_close_errors_are_reported() {
        let not_found = json!({ "chart": { "result": null, "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" } } });
        assert!(matches!(parse_previous_close(&not_found), Err(TickerError::Fetch(_))));
        assert!(matches!(parse_previous_close(&json!({})), Err(TickerError::MissingData(_))));
    }

    #[test]
    fn base_url_is_normalized() {
        let source = YahooSource::with_base_url("http://127.0.0.1:9/").unwrap();
        assert_eq!(source.base_url, "http://127.0.0.1:9");
    }
}
