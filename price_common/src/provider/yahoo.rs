//! Yahoo Finance implementation of `MarketData`.
//!
//! Yahoo's unofficial API needs a session cookie plus a crumb token for the
//! quote endpoint:
//! 1. visit the cookie host so the client's cookie store receives a session cookie;
//! 2. fetch the crumb from `/v1/test/getcrumb` and pass it as a query parameter.
//!
//! The crumb is cached and refreshed once when the quote endpoint answers
//! 401/403. The chart endpoint used for bars works without it.
use std::sync::Mutex;

use chrono::DateTime;
use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::REFERER;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::market::{Bar, BarWindow, MarketData, Snapshot};
use crate::{QuoteError, Result};

const REFERER_URL: &str = "https://finance.yahoo.com/";

/// Blocking Yahoo Finance client.
pub struct YahooProvider {
    client: Client,
    config: ProviderConfig,
    crumb: Mutex<Option<String>>,
}

impl YahooProvider {
    /// Builds the HTTP client (cookie store, user agent, timeout) from `config`.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            config,
            crumb: Mutex::new(None),
        })
    }

    fn crumb(&self) -> Result<String> {
        if let Some(crumb) = self.crumb.lock()?.clone() {
            return Ok(crumb);
        }
        let crumb = self.fetch_crumb()?;
        *self.crumb.lock()? = Some(crumb.clone());
        Ok(crumb)
    }

    fn invalidate_crumb(&self) -> Result<()> {
        *self.crumb.lock()? = None;
        Ok(())
    }

    fn fetch_crumb(&self) -> Result<String> {
        debug!("Refreshing Yahoo session cookie from {}", self.config.cookie_url);
        // The cookie host answers 404 but still sets the session cookie.
        self.client
            .get(&self.config.cookie_url)
            .header(REFERER, REFERER_URL)
            .send()?;

        let url = format!("{}/v1/test/getcrumb", self.config.base_url);
        let response = self.client.get(&url).header(REFERER, REFERER_URL).send()?;
        let status = response.status();
        let body = response.text()?;
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(QuoteError::RateLimited(url));
        }
        if !status.is_success() {
            return Err(QuoteError::Auth(format!(
                "crumb endpoint returned status {}",
                status.as_u16()
            )));
        }
        parse_crumb(&body)
    }

    fn send_quote_request(&self, url: &str, symbol: &str) -> Result<Response> {
        let crumb = self.crumb()?;
        debug!("GET {} symbols={}", url, symbol);
        let response = self
            .client
            .get(url)
            .query(&[("symbols", symbol), ("crumb", crumb.as_str())])
            .header(REFERER, REFERER_URL)
            .send()?;
        Ok(response)
    }
}

impl MarketData for YahooProvider {
    fn snapshot(&self, symbol: &str) -> Result<Snapshot> {
        let url = format!("{}/v7/finance/quote", self.config.base_url);
        let mut response = self.send_quote_request(&url, symbol)?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            debug!("Yahoo rejected the crumb ({}), retrying once", response.status());
            self.invalidate_crumb()?;
            response = self.send_quote_request(&url, symbol)?;
        }

        check_status(response.status(), &url)?;
        parse_quote(&response.text()?, symbol)
    }

    fn bars(&self, symbol: &str, window: BarWindow) -> Result<Vec<Bar>> {
        let url = format!(
            "{}/v8/finance/chart/{}",
            self.config.base_url,
            urlencoding::encode(symbol)
        );
        debug!("GET {} range={} interval={}", url, window.period, window.granularity);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("range", window.period.to_string()),
                ("interval", window.granularity.to_string()),
            ])
            .header(REFERER, REFERER_URL)
            .send()?;

        check_status(response.status(), &url)?;
        parse_chart(&response.text()?)
    }
}

fn check_status(status: StatusCode, url: &str) -> Result<()> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(QuoteError::RateLimited(String::from(url)));
    }
    if !status.is_success() {
        return Err(QuoteError::Status {
            status: status.as_u16(),
            url: String::from(url),
        });
    }
    Ok(())
}

fn parse_crumb(body: &str) -> Result<String> {
    let crumb = body.trim();
    if crumb.to_lowercase().contains("too many requests") {
        return Err(QuoteError::RateLimited(String::from("getcrumb")));
    }
    if crumb.is_empty() || crumb.len() >= 100 || crumb.contains(char::is_whitespace) || crumb.contains('<')
    {
        return Err(QuoteError::Auth(String::from("unexpected crumb response")));
    }
    Ok(String::from(crumb))
}

fn parse_quote(body: &str, symbol: &str) -> Result<Snapshot> {
    let response: YahooQuoteResponse = serde_json::from_str(body)?;
    if let Some(error) = response.quote_response.error {
        return Err(QuoteError::Upstream(error.to_string()));
    }
    let quote = response
        .quote_response
        .result
        .into_iter()
        .next()
        .ok_or_else(|| QuoteError::SymbolNotFound(String::from(symbol)))?;

    Ok(Snapshot {
        current_price: quote.regular_market_price,
        previous_close: quote.regular_market_previous_close,
        day_high: quote.regular_market_day_high,
        day_low: quote.regular_market_day_low,
        volume: quote.regular_market_volume,
    })
}

fn parse_chart(body: &str) -> Result<Vec<Bar>> {
    let response: YahooChartResponse = serde_json::from_str(body)?;
    if let Some(error) = response.chart.error {
        return Err(QuoteError::Upstream(error.to_string()));
    }
    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let timestamps = result.timestamp.unwrap_or_default();
    let Some(quote) = result.indicators.quote.first() else {
        return Ok(Vec::new());
    };

    // Points with any missing OHLC value are dropped.
    let bars = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            Some(Bar {
                timestamp: DateTime::from_timestamp(ts, 0)?,
                open: quote.open.get(i).copied().flatten()?,
                high: quote.high.get(i).copied().flatten()?,
                low: quote.low.get(i).copied().flatten()?,
                close: quote.close.get(i).copied().flatten()?,
                volume: quote
                    .volume
                    .get(i)
                    .copied()
                    .flatten()
                    .and_then(whole_volume)
                    .unwrap_or(0),
            })
        })
        .collect();
    Ok(bars)
}

// Yahoo Finance API response structures

#[derive(Debug, Clone, Deserialize)]
struct YahooApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

impl std::fmt::Display for YahooApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.description)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: YahooQuoteResponseData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteResponseData {
    #[serde(default)]
    result: Vec<YahooQuoteData>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteData {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "regularMarketPreviousClose")]
    regular_market_previous_close: Option<f64>,
    #[serde(rename = "regularMarketDayHigh")]
    regular_market_day_high: Option<f64>,
    #[serde(rename = "regularMarketDayLow")]
    regular_market_day_low: Option<f64>,
    #[serde(
        rename = "regularMarketVolume",
        default,
        deserialize_with = "lenient_volume"
    )]
    regular_market_volume: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Accepts a volume sent as an integer, a float or a numeric string; anything
/// else leaves the field unresolved instead of failing the whole quote.
fn lenient_volume<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().and_then(whole_volume)),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().and_then(whole_volume),
        _ => None,
    })
}

/// Truncates a non-negative, finite volume to a share count.
fn whole_volume(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0 && value < u64::MAX as f64).then(|| value as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_fields_map_to_snapshot() {
        let body = r#"{"quoteResponse":{"result":[{
            "symbol":"NVDA",
            "regularMarketPrice":875.28,
            "regularMarketPreviousClose":926.69,
            "regularMarketDayHigh":974.0,
            "regularMarketDayLow":865.06,
            "regularMarketVolume":113299600
        }],"error":null}}"#;

        let snapshot = parse_quote(body, "NVDA").expect("valid payload");

        assert_eq!(snapshot.current_price, Some(875.28));
        assert_eq!(snapshot.previous_close, Some(926.69));
        assert_eq!(snapshot.day_high, Some(974.0));
        assert_eq!(snapshot.day_low, Some(865.06));
        assert_eq!(snapshot.volume, Some(113_299_600));
        assert!(snapshot.is_complete());
    }

    #[test]
    fn missing_quote_fields_stay_unresolved() {
        let body = r#"{"quoteResponse":{"result":[{"symbol":"NVDA","regularMarketPrice":10.5}],"error":null}}"#;

        let snapshot = parse_quote(body, "NVDA").expect("valid payload");

        assert_eq!(snapshot.current_price, Some(10.5));
        assert_eq!(snapshot.previous_close, None);
        assert_eq!(snapshot.volume, None);
    }

    #[test]
    fn float_volume_is_accepted() {
        let body = r#"{"quoteResponse":{"result":[{
            "regularMarketPrice":875.28,
            "regularMarketPreviousClose":926.69,
            "regularMarketDayHigh":974.0,
            "regularMarketDayLow":865.06,
            "regularMarketVolume":1.2e8
        }],"error":null}}"#;

        let snapshot = parse_quote(body, "NVDA").expect("valid payload");

        assert_eq!(snapshot.volume, Some(120_000_000));
        assert!(snapshot.is_complete());
    }

    #[test]
    fn unreadable_volume_only_drops_that_field() {
        let body = r#"{"quoteResponse":{"result":[{
            "regularMarketPrice":875.28,
            "regularMarketPreviousClose":926.69,
            "regularMarketDayHigh":974.0,
            "regularMarketDayLow":865.06,
            "regularMarketVolume":"n/a"
        }],"error":null}}"#;

        let snapshot = parse_quote(body, "NVDA").expect("valid payload");

        assert_eq!(snapshot.current_price, Some(875.28));
        assert_eq!(snapshot.day_low, Some(865.06));
        assert_eq!(snapshot.volume, None);
    }

    #[test]
    fn negative_or_fractional_volume_is_handled() {
        assert_eq!(whole_volume(1_234.9), Some(1_234));
        assert_eq!(whole_volume(-5.0), None);
        assert_eq!(whole_volume(f64::NAN), None);
    }

    #[test]
    fn empty_quote_result_is_symbol_not_found() {
        let body = r#"{"quoteResponse":{"result":[],"error":null}}"#;

        let err = parse_quote(body, "NOPE").expect_err("no result");
        assert!(matches!(err, QuoteError::SymbolNotFound(symbol) if symbol == "NOPE"));
    }

    #[test]
    fn malformed_quote_body_is_a_json_error() {
        assert!(matches!(
            parse_quote("<html>", "NVDA"),
            Err(QuoteError::SerdeJson(_))
        ));
    }

    #[test]
    fn chart_points_without_ohlc_are_skipped() {
        let body = r#"{"chart":{"result":[{
            "meta":{"symbol":"NVDA"},
            "timestamp":[1709906400,1709906460,1709906520],
            "indicators":{"quote":[{
                "open":[100.0,null,102.0],
                "high":[101.0,null,103.5],
                "low":[99.5,null,101.25],
                "close":[100.5,null,103.0],
                "volume":[1200,0,null]
            }]}
        }],"error":null}}"#;

        let bars = parse_chart(body).expect("valid chart");

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 100.5);
        assert_eq!(bars[0].volume, 1200);
        assert_eq!(bars[1].high, 103.5);
        assert_eq!(bars[1].volume, 0);
        assert_eq!(bars[1].timestamp.timestamp(), 1709906520);
    }

    #[test]
    fn chart_api_error_is_reported() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

        let err = parse_chart(body).expect_err("api error");
        assert!(matches!(err, QuoteError::Upstream(msg) if msg.contains("delisted")));
    }

    #[test]
    fn chart_without_trades_yields_no_bars() {
        let body = r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[{}]}}],"error":null}}"#;

        assert!(parse_chart(body).expect("valid chart").is_empty());
    }

    #[test]
    fn crumb_body_is_validated() {
        assert_eq!(parse_crumb("abc.DEF/12\n").expect("valid crumb"), "abc.DEF/12");
        assert!(matches!(parse_crumb(""), Err(QuoteError::Auth(_))));
        assert!(matches!(parse_crumb("<!DOCTYPE html>"), Err(QuoteError::Auth(_))));
        assert!(matches!(
            parse_crumb("Too Many Requests"),
            Err(QuoteError::RateLimited(_))
        ));
    }

    #[test]
    fn status_codes_map_to_errors() {
        assert!(check_status(StatusCode::OK, "u").is_ok());
        assert!(matches!(
            check_status(StatusCode::TOO_MANY_REQUESTS, "u"),
            Err(QuoteError::RateLimited(_))
        ));
        assert!(matches!(
            check_status(StatusCode::NOT_FOUND, "u"),
            Err(QuoteError::Status { status: 404, .. })
        ));
    }

    #[test]
    fn provider_builds_from_default_config() {
        assert!(YahooProvider::new(ProviderConfig::default()).is_ok());
    }
}
