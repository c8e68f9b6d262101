use super::{test_config, test_credential, test_request};
use anyhow::Result;
use driftsign_aws_v4::{
    AuthScheme, Config, SchemeName, SigV4Signer, SigV4aSigner, SignerResolver, SigningContext,
    SigningProperties,
};
use driftsign_core::{Context, StaticEnv};
use http::header::AUTHORIZATION;
use std::collections::HashMap;
use std::sync::Arc;

fn props_for(config: Arc<Config>, context: SigningContext) -> SigningProperties {
    let signer = Arc::new(SignerResolver::new(config.clone()));
    SigningProperties::new()
        .with_context(context)
        .with_config(config)
        .with_signer(signer)
}

#[tokio::test]
async fn test_region_set_from_env_config() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new().with_env(StaticEnv {
        envs: HashMap::from_iter([(
            "AWS_SIGV4A_SIGNING_REGION_SET".to_string(),
            "us-east-1,us-west-2".to_string(),
        )]),
    });

    let config = Arc::new((*test_config()).clone().from_env(&ctx));
    let props = props_for(config, SigningContext::new());

    let mut parts = test_request("http://127.0.0.1:9000/hello");
    SigV4aSigner::new()
        .sign(&ctx, &mut parts, &test_credential(), &props, None)
        .await?;

    assert_eq!(parts.headers["x-amz-region-set"], "us-east-1,us-west-2");
    let authorization = parts.headers[AUTHORIZATION].to_str()?;
    assert!(
        authorization.contains("/us-east-1,us-west-2/s3/aws4_request"),
        "unexpected scope: {authorization}"
    );

    Ok(())
}

#[tokio::test]
async fn test_negotiated_scheme_region_set() -> Result<()> {
    let context = SigningContext::new().with_auth_scheme(
        AuthScheme::new(SchemeName::SigV4a).with_signing_region_set(&["eu-west-1", "eu-north-1"]),
    );
    let props = props_for(test_config(), context);

    let mut parts = test_request("http://127.0.0.1:9000/hello");
    SigV4aSigner::new()
        .sign(
            &Context::new(),
            &mut parts,
            &test_credential(),
            &props,
            None,
        )
        .await?;

    assert_eq!(parts.headers["x-amz-region-set"], "eu-west-1,eu-north-1");

    Ok(())
}

/// A request that negotiated `[sigv4a, sigv4]` signs with the second
/// scheme's identity.
#[tokio::test]
async fn test_downgrade_to_single_region() -> Result<()> {
    let context = SigningContext::new()
        .with_auth_scheme(AuthScheme::new(SchemeName::SigV4a).with_signing_region("A"))
        .with_auth_scheme(
            AuthScheme::new(SchemeName::SigV4)
                .with_signing_region("B")
                .with_signing_name("svcB"),
        );
    let props = props_for(test_config(), context);

    let mut parts = test_request("http://127.0.0.1:9000/hello");
    SigV4Signer::new()
        .sign(
            &Context::new(),
            &mut parts,
            &test_credential(),
            &props,
            None,
        )
        .await?;

    let authorization = parts.headers[AUTHORIZATION].to_str()?;
    assert!(
        authorization.contains("/B/svcB/aws4_request"),
        "unexpected scope: {authorization}"
    );

    Ok(())
}
