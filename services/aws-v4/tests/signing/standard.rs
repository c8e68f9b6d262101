use super::{test_config, test_credential, test_request};
use anyhow::Result;
use async_trait::async_trait;
use driftsign_aws_v4::{Credential, DefaultCredentialProvider, SignerResolver};
use driftsign_core::time::parse_iso8601;
use driftsign_core::{Context, ProvideCredential, Signer};
use http::header::AUTHORIZATION;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn test_signer_end_to_end() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let config = test_config();
    let ctx = Context::new();
    let signer = Signer::new(
        ctx,
        DefaultCredentialProvider::new(config.clone()),
        SignerResolver::new(config),
    );

    let mut parts = test_request("http://127.0.0.1:9000/hello");
    signer.sign(&mut parts, None).await?;

    let authorization = parts.headers[AUTHORIZATION].to_str()?;
    assert!(authorization.starts_with(
        "AWS4-HMAC-SHA256 Credential=access_key_id/"
    ));
    assert!(authorization.contains("/test/s3/aws4_request"));
    assert!(authorization.contains("SignedHeaders=host;x-amz-content-sha256;x-amz-date"));

    // The embedded timestamp must parse and sit near local time.
    let date = parse_iso8601(parts.headers["x-amz-date"].to_str()?)?;
    let drift = (date - driftsign_core::time::now()).num_seconds().abs();
    assert!(drift < 10, "x-amz-date drifted {drift}s from local time");

    assert_eq!(parts.headers["host"], "127.0.0.1:9000");

    Ok(())
}

#[tokio::test]
async fn test_signer_with_session_token() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut config = (*test_config()).clone();
    config.session_token = Some("session_token".to_string());
    let config = Arc::new(config);

    let signer = Signer::new(
        Context::new(),
        DefaultCredentialProvider::new(config.clone()),
        SignerResolver::new(config),
    );

    let mut parts = test_request("http://127.0.0.1:9000/hello");
    signer.sign(&mut parts, None).await?;

    assert_eq!(parts.headers["x-amz-security-token"], "session_token");
    let authorization = parts.headers[AUTHORIZATION].to_str()?;
    assert!(authorization.contains("x-amz-security-token"));

    Ok(())
}

#[derive(Debug)]
struct CountingProvider {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ProvideCredential for CountingProvider {
    type Credential = Credential;

    async fn provide_credential(
        &self,
        _: &Context,
    ) -> driftsign_core::Result<Option<Self::Credential>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(test_credential()))
    }
}

/// Concurrent and repeated signings share one resolved credential.
#[tokio::test]
async fn test_signer_memoizes_credential() -> Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let signer = Signer::new(
        Context::new(),
        CountingProvider {
            calls: calls.clone(),
        },
        SignerResolver::new(test_config()),
    );

    for _ in 0..5 {
        let mut parts = test_request("http://127.0.0.1:9000/hello");
        signer.sign(&mut parts, None).await?;
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);

    Ok(())
}

/// Without any credential source the request passes through unsigned.
#[tokio::test]
async fn test_signer_anonymous_pass_through() -> Result<()> {
    let mut config = (*test_config()).clone();
    config.access_key_id = None;
    config.secret_access_key = None;
    let config = Arc::new(config);

    let signer = Signer::new(
        Context::new(),
        DefaultCredentialProvider::new(config.clone()),
        SignerResolver::new(config),
    );

    let mut parts = test_request("http://127.0.0.1:9000/hello");
    signer.sign(&mut parts, None).await?;

    assert!(parts.headers.get(AUTHORIZATION).is_none());

    Ok(())
}
