use std::time::Duration;

use chart_trendlines::ChartError;
use chart_trendlines::data::{DEFAULT_KLINES_ENDPOINT, KlineClient, KlineRequest, parse_kline_rows};
use rust_decimal::Decimal;
use serde_json::{Value, json};

fn binance_row(open_time_ms: i64, ohlc: [&str; 4]) -> Vec<Value> {
    vec![
        json!(open_time_ms),
        json!(ohlc[0]),
        json!(ohlc[1]),
        json!(ohlc[2]),
        json!(ohlc[3]),
        json!("1234.5"),
        json!(open_time_ms + 86_399_999),
        json!("0"),
        json!(42),
        json!("0"),
        json!("0"),
        json!("0"),
    ]
}

#[test]
fn binance_rows_normalize_in_order() {
    let rows = vec![
        binance_row(1_748_736_000_000, ["100.00000000", "110.0", "90.0", "105.0"]),
        binance_row(1_748_822_400_000, ["105.0", "120.0", "100.0", "115.0"]),
        binance_row(1_748_908_800_000, ["115.0", "125.0", "110.0", "112.0"]),
        binance_row(1_748_995_200_000, ["112.0", "118.0", "108.0", "110.0"]),
    ];

    let candles = parse_kline_rows(&rows).expect("parse rows");
    assert_eq!(candles.len(), 4);
    let days: Vec<String> = candles.iter().map(|c| c.time.to_string()).collect();
    assert_eq!(days, ["2025-06-01", "2025-06-02", "2025-06-03", "2025-06-04"]);
    assert_eq!(candles[0].open, Decimal::from(100));
    assert_eq!(candles[2].close, Decimal::from(112));
}

#[test]
fn short_row_fails_the_whole_batch() {
    let rows = vec![
        binance_row(1_748_736_000_000, ["100", "110", "90", "105"]),
        vec![json!(1_748_822_400_000_i64), json!("105"), json!("120")],
    ];
    let err = parse_kline_rows(&rows).expect_err("short row");
    assert!(matches!(err, ChartError::Fetch(_)));
}

#[test]
fn non_numeric_price_fails_the_whole_batch() {
    let rows = vec![binance_row(1_748_736_000_000, ["100", "abc", "90", "105"])];
    assert!(matches!(
        parse_kline_rows(&rows),
        Err(ChartError::Fetch(_))
    ));
}

#[test]
fn inconsistent_envelope_is_rejected() {
    let rows = vec![binance_row(1_748_736_000_000, ["100", "95", "90", "105"])];
    assert!(parse_kline_rows(&rows).is_err());
}

#[test]
fn empty_response_yields_no_candles() {
    assert!(parse_kline_rows(&[]).expect("empty").is_empty());
}

#[test]
fn request_validation_rejects_missing_fields() {
    assert!(KlineRequest::new("BTCUSDT", "1d", 4).validate().is_ok());
    assert!(matches!(
        KlineRequest::new("", "1d", 4).validate(),
        Err(ChartError::Validation(_))
    ));
    assert!(matches!(
        KlineRequest::new("BTCUSDT", "", 4).validate(),
        Err(ChartError::Validation(_))
    ));
    assert!(matches!(
        KlineRequest::new("BTCUSDT", "1d", 0).validate(),
        Err(ChartError::Validation(_))
    ));
}

#[test]
fn default_client_targets_binance_spot() {
    let client = KlineClient::new().expect("client");
    assert_eq!(client.endpoint(), DEFAULT_KLINES_ENDPOINT);
}

#[tokio::test]
async fn invalid_request_is_rejected_before_any_io() {
    let client = KlineClient::with_settings("http://127.0.0.1:9/api/v3/klines", Duration::from_secs(1))
        .expect("client");
    let err = client
        .fetch(&KlineRequest::new("BTCUSDT", "", 4))
        .await
        .expect_err("validation error");
    assert!(matches!(err, ChartError::Validation(_)));
}

#[tokio::test]
async fn unreachable_endpoint_maps_to_fetch_error() {
    let client = KlineClient::with_settings("http://127.0.0.1:9/api/v3/klines", Duration::from_secs(2))
        .expect("client");
    let err = client
        .fetch(&KlineRequest::new("BTCUSDT", "1d", 4))
        .await
        .expect_err("connection refused");
    assert!(matches!(err, ChartError::Fetch(_)));
}
