//! Transport-level tests for the REST API client.
//!
//! A local mock server stands in for the upstream API so every retry and
//! error-classification path can be exercised without network access. Retry
//! delays are configured in single-digit milliseconds to keep the suite fast.

use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;
use tokio_test::assert_ok;

use coinfeed::api::{ApiError, CoinGeckoClient, RetryConfig};
use coinfeed::shared::SamplingInterval;

/// Client wired to the mock server with millisecond backoff delays.
fn test_client(server: &MockServer, max_retries: u32) -> CoinGeckoClient {
    CoinGeckoClient::builder(server.base_url())
        .timeout(Duration::from_secs(2))
        .with_retry(
            RetryConfig::new(max_retries)
                .with_base_delay_ms(1)
                .with_max_delay_ms(10),
        )
        .build()
        .expect("client builds")
}

#[tokio::test]
async fn ping_succeeds_on_2xx() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/ping");
            then.status(200).json_body(json!({"gecko_says": "(V3) To the Moon!"}));
        })
        .await;

    let client = test_client(&server, 3);
    tokio_test::assert_ok!(client.ping().await);
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn ping_failure_maps_to_upstream_unavailable_without_retry() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/ping");
            then.status(503);
        })
        .await;

    // Even with a retry budget, the liveness probe issues a single attempt.
    let client = test_client(&server, 3);
    let err = client.ping().await.unwrap_err();
    assert!(matches!(err, ApiError::UpstreamUnavailable(_)));
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn api_key_header_is_sent_on_every_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/coins/bitcoin")
                .header("x-cg-demo-api-key", "CG-test-key")
                .query_param("localization", "false")
                .query_param("tickers", "false")
                .query_param("market_data", "true")
                .query_param("community_data", "false")
                .query_param("developer_data", "false")
                .query_param("sparkline", "false");
            then.status(200).json_body(json!({
                "id": "bitcoin",
                "symbol": "btc",
                "name": "Bitcoin",
                "market_data": {
                    "current_price": {"usd": 64250.12},
                    "price_change_percentage_24h": -1.85
                }
            }));
        })
        .await;

    let client = CoinGeckoClient::builder(server.base_url())
        .api_key("CG-test-key")
        .build()
        .expect("client builds");

    let coin = client.coin("bitcoin").await.expect("coin fetch succeeds");
    let quote = coin.quote().expect("quote validates");
    assert_eq!(quote.symbol, "BTC");
    assert_eq!(quote.price_usd, 64250.12);
    assert_eq!(quote.change_percent_24h, -1.85);
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn unauthorized_fails_after_exactly_one_attempt() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/coins/bitcoin");
            then.status(401)
                .json_body(json!({"error": "invalid api key"}));
        })
        .await;

    let client = test_client(&server, 5);
    let err = client.coin("bitcoin").await.unwrap_err();
    assert!(matches!(err, ApiError::Auth(msg) if msg.contains("invalid api key")));
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn forbidden_is_an_auth_error_too() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/coins/bitcoin");
            then.status(403).json_body(json!({"error": "forbidden"}));
        })
        .await;

    let client = test_client(&server, 5);
    let err = client.coin("bitcoin").await.unwrap_err();
    assert!(matches!(err, ApiError::Auth(_)));
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn persistent_rate_limit_exhausts_the_retry_budget() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/coins/bitcoin");
            then.status(429)
                .header("Retry-After", "0")
                .json_body(json!({
                    "status": {"error_code": 429, "error_message": "You've exceeded the Rate Limit."}
                }));
        })
        .await;

    let client = test_client(&server, 2);
    let err = client.coin("bitcoin").await.unwrap_err();
    assert!(matches!(err, ApiError::RateLimitExhausted { attempts: 3 }));
    // first attempt + two retries
    mock.assert_hits_async(3).await;
}

#[tokio::test]
async fn rate_limit_without_retry_after_falls_back_to_backoff() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/coins/bitcoin");
            then.status(429);
        })
        .await;

    let client = test_client(&server, 1);
    let err = client.coin("bitcoin").await.unwrap_err();
    assert!(matches!(err, ApiError::RateLimitExhausted { attempts: 2 }));
    mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn server_errors_are_not_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/coins/bitcoin");
            then.status(500)
                .json_body(json!({"error": "internal server error"}));
        })
        .await;

    let client = test_client(&server, 5);
    let err = client.coin("bitcoin").await.unwrap_err();
    match err {
        ApiError::UnexpectedStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal server error");
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn timeouts_are_retried_then_surface_as_transport() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/coins/bitcoin");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(json!({"id": "bitcoin", "symbol": "btc"}));
        })
        .await;

    let client = CoinGeckoClient::builder(server.base_url())
        .timeout(Duration::from_millis(100))
        .with_retry(RetryConfig::new(1).with_base_delay_ms(1))
        .build()
        .expect("client builds");

    let err = client.coin("bitcoin").await.unwrap_err();
    match err {
        ApiError::Transport(e) => assert!(e.is_timeout()),
        other => panic!("expected Transport, got {other:?}"),
    }
    // one attempt plus one retry, both timing out
    mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn market_chart_parses_timestamp_price_pairs() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/coins/ethereum/market_chart")
                .query_param("vs_currency", "usd")
                .query_param("days", "7")
                .query_param("interval", "daily");
            then.status(200).json_body(json!({
                "prices": [
                    [1704067200000i64, 2280.0],
                    [1704153600000i64, 2305.5],
                    [1704240000000i64, 2290.25]
                ]
            }));
        })
        .await;

    let client = test_client(&server, 0);
    let chart = client
        .market_chart("ethereum", 7, SamplingInterval::Daily)
        .await
        .expect("chart fetch succeeds");
    assert_eq!(chart.price_series(), vec![2280.0, 2305.5, 2290.25]);
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn malformed_body_is_a_data_shape_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/coins/bitcoin/market_chart");
            then.status(200).body("not json at all");
        })
        .await;

    let client = test_client(&server, 0);
    let err = client
        .market_chart("bitcoin", 30, SamplingInterval::Daily)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::DataShape(_)));
}

#[tokio::test]
async fn empty_coin_id_is_rejected_before_any_request() {
    let server = MockServer::start_async().await;
    let client = test_client(&server, 0);
    let err = client.coin("").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidParameter(_)));
}
