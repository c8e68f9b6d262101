use anyhow::Result;
use chrono::TimeDelta;
use driftsign_aws_v4::{Config, DefaultCredentialProvider, SignerResolver};
use driftsign_core::time::{format_http_date, now, parse_iso8601};
use driftsign_core::{Context, Error, Signer};
use http::{HeaderMap, HeaderValue};
use std::sync::Arc;

fn client_config() -> Arc<Config> {
    Arc::new(Config {
        access_key_id: Some("access_key_id".to_string()),
        secret_access_key: Some("secret_access_key".to_string()),
        region: Some("test".to_string()),
        service: Some("s3".to_string()),
        ..Default::default()
    })
}

fn response_headers(server_time: chrono::DateTime<chrono::Utc>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        http::header::DATE,
        HeaderValue::from_str(&format_http_date(server_time)).expect("valid header"),
    );
    headers
}

/// The full correction loop: a server 400s ahead is observed, the offset
/// lands near 400s, and the next signature embeds the corrected time.
#[tokio::test]
async fn test_observed_skew_drives_next_signature() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let config = client_config();
    assert_eq!(config.clock.offset(), 0);

    // Success handler: response with a `Date` header 400s ahead.
    let corrected = config
        .clock
        .observe_headers(&response_headers(now() + TimeDelta::seconds(400)));
    assert!(corrected);
    let offset = config.clock.offset();
    assert!(
        (offset - 400_000).abs() < 5_000,
        "offset should be about 400000ms, was {offset}"
    );

    // The next signing call embeds the corrected timestamp.
    let signer = Signer::new(
        Context::new(),
        DefaultCredentialProvider::new(config.clone()),
        SignerResolver::new(config.clone()),
    );
    let mut parts = http::Request::builder()
        .method("GET")
        .uri("http://127.0.0.1:9000/hello")
        .body(())
        .unwrap()
        .into_parts()
        .0;
    signer.sign(&mut parts, None).await?;

    let date = parse_iso8601(parts.headers["x-amz-date"].to_str()?)?;
    let lead = date - now();
    assert!(
        lead >= TimeDelta::seconds(394) && lead <= TimeDelta::seconds(406),
        "signature timestamp should lead local time by about 400s, was {lead}"
    );

    Ok(())
}

/// Re-observing the same response leaves the offset where the first
/// observation put it.
#[tokio::test]
async fn test_success_handler_is_idempotent() {
    let config = client_config();
    let headers = response_headers(now() + TimeDelta::seconds(400));

    assert!(config.clock.observe_headers(&headers));
    let offset = config.clock.offset();

    assert!(!config.clock.observe_headers(&headers));
    assert_eq!(config.clock.offset(), offset);
}

/// Responses within the skew window leave the offset alone.
#[tokio::test]
async fn test_small_drift_is_ignored() {
    let config = client_config();

    let corrected = config
        .clock
        .observe_headers(&response_headers(now() + TimeDelta::seconds(30)));
    assert!(!corrected);
    assert_eq!(config.clock.offset(), 0);
}

/// The failure hook corrects the offset, annotates the error, and leaves
/// the error itself intact.
#[tokio::test]
async fn test_failed_response_corrects_and_annotates() {
    let config = client_config();
    let server_time = now() + TimeDelta::seconds(400);

    let err = config.clock.correct_error(
        Error::unexpected("RequestTimeTooSkewed: signature expired"),
        Some(server_time),
    );
    assert!(err.clock_skew_corrected());
    assert_eq!(err.to_string(), "RequestTimeTooSkewed: signature expired");
    assert!((config.clock.offset() - 400_000).abs() < 5_000);

    // A later failure with the same server time no longer moves the offset,
    // so the annotation stays off.
    let err = config
        .clock
        .correct_error(Error::unexpected("403 forbidden"), Some(server_time));
    assert!(!err.clock_skew_corrected());
}
