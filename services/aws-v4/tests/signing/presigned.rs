use super::{test_config, test_request};
use anyhow::Result;
use driftsign_aws_v4::{DefaultCredentialProvider, SignerResolver};
use driftsign_core::{Context, Signer};
use http::header::AUTHORIZATION;
use std::collections::HashMap;
use std::time::Duration;

fn query_map(parts: &http::request::Parts) -> HashMap<String, String> {
    form_urlencoded::parse(parts.uri.query().unwrap_or_default().as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[tokio::test]
async fn test_presigned_query_shape() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let config = test_config();
    let signer = Signer::new(
        Context::new(),
        DefaultCredentialProvider::new(config.clone()),
        SignerResolver::new(config),
    );

    let mut parts = test_request("http://127.0.0.1:9000/hello");
    signer
        .sign(&mut parts, Some(Duration::from_secs(3600)))
        .await?;

    assert!(parts.headers.get(AUTHORIZATION).is_none());

    let query = query_map(&parts);
    assert_eq!(query["X-Amz-Algorithm"], "AWS4-HMAC-SHA256");
    assert_eq!(query["X-Amz-Expires"], "3600");
    assert_eq!(query["X-Amz-SignedHeaders"], "host");
    assert!(query["X-Amz-Credential"].ends_with("/test/s3/aws4_request"));
    assert_eq!(query["X-Amz-Signature"].len(), 64);

    Ok(())
}

#[tokio::test]
async fn test_presigned_preserves_existing_query() -> Result<()> {
    let config = test_config();
    let signer = Signer::new(
        Context::new(),
        DefaultCredentialProvider::new(config.clone()),
        SignerResolver::new(config),
    );

    let mut parts = test_request("http://127.0.0.1:9000/hello?list-type=2&prefix=CI/");
    signer
        .sign(&mut parts, Some(Duration::from_secs(600)))
        .await?;

    let query = query_map(&parts);
    assert_eq!(query["list-type"], "2");
    assert_eq!(query["prefix"], "CI/");
    assert_eq!(query["X-Amz-Expires"], "600");

    Ok(())
}
