use crate::constants::X_AMZ_REGION_SET;
use crate::properties::SigningProperties;
use crate::sign_request::SigningParams;
use crate::Credential;
use driftsign_core::{Context, Result};
use http::request::Parts;
use http::HeaderValue;
use std::time::Duration;

/// SigV4aSigner signs a request under the multi-region `sigv4a` auth scheme.
///
/// A sigv4a signature is valid in every region of its signing region set.
/// On the wire the set travels comma-joined in the region slot of the
/// credential scope, plus the `x-amz-region-set` header for header-signed
/// requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SigV4aSigner;

impl SigV4aSigner {
    /// Create a new sigv4a scheme signer.
    pub fn new() -> Self {
        Self
    }

    /// Sign the request with the given credential and signing properties.
    pub async fn sign(
        &self,
        ctx: &Context,
        req: &mut Parts,
        credential: &Credential,
        props: &SigningProperties,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let validated = props.validated()?;
        let resolved = validated
            .signer
            .resolve(ctx, validated.context.primary_scheme())
            .await?;

        let region = props
            .signing_region()
            .unwrap_or(&resolved.signing_region)
            .to_string();
        let name = props
            .signing_name()
            .unwrap_or(&resolved.signing_name)
            .to_string();

        // Region set preference: client config, then the per-request
        // properties, then the negotiated scheme, then the signing region
        // alone.
        let region_set = validated
            .config
            .signing_region_set
            .clone()
            .or_else(|| props.signing_region_set().map(<[String]>::to_vec))
            .or_else(|| resolved.signing_region_set.clone())
            .unwrap_or_else(|| vec![region]);
        let joined = region_set.join(",");

        // Header-signed requests carry the set explicitly so the signature
        // covers it.
        if expires_in.is_none() {
            req.headers
                .insert(X_AMZ_REGION_SET, HeaderValue::from_str(&joined)?);
        }

        let mut params = SigningParams::new(validated.config.clock.now(), &joined, &name);
        if let Some(expires_in) = expires_in {
            params = params.with_expires_in(expires_in);
        }

        resolved.signer.sign_with(req, credential, &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, SignerResolver, SigningContext};
    use http::header::AUTHORIZATION;
    use std::sync::Arc;

    fn config() -> Config {
        Config {
            region: Some("us-east-1".to_string()),
            service: Some("s3".to_string()),
            ..Default::default()
        }
    }

    fn credential() -> Credential {
        Credential {
            access_key_id: "access_key_id".to_string(),
            secret_access_key: "secret_access_key".to_string(),
            ..Default::default()
        }
    }

    fn props(cfg: Arc<Config>) -> SigningProperties {
        let signer = Arc::new(SignerResolver::new(cfg.clone()));
        SigningProperties::new()
            .with_context(SigningContext::new())
            .with_config(cfg)
            .with_signer(signer)
    }

    fn request() -> Parts {
        http::Request::builder()
            .method("GET")
            .uri("https://example.com/hello")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn test_sign_joins_region_set() -> anyhow::Result<()> {
        let cfg = Arc::new(config());
        let props = props(cfg).with_signing_region_set(&["us-east-1", "us-west-2"]);

        let mut parts = request();
        SigV4aSigner::new()
            .sign(&Context::new(), &mut parts, &credential(), &props, None)
            .await?;

        assert_eq!(parts.headers[X_AMZ_REGION_SET], "us-east-1,us-west-2");
        let authorization = parts.headers[AUTHORIZATION].to_str()?;
        assert!(
            authorization.contains("/us-east-1,us-west-2/s3/aws4_request"),
            "unexpected scope: {authorization}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_config_region_set_wins_over_properties() -> anyhow::Result<()> {
        let mut cfg = config();
        cfg.signing_region_set = Some(vec!["eu-west-1".to_string(), "eu-north-1".to_string()]);

        let props = props(Arc::new(cfg)).with_signing_region_set(&["us-east-1"]);

        let mut parts = request();
        SigV4aSigner::new()
            .sign(&Context::new(), &mut parts, &credential(), &props, None)
            .await?;

        assert_eq!(parts.headers[X_AMZ_REGION_SET], "eu-west-1,eu-north-1");

        Ok(())
    }

    #[tokio::test]
    async fn test_region_set_falls_back_to_signing_region() -> anyhow::Result<()> {
        let mut parts = request();
        SigV4aSigner::new()
            .sign(
                &Context::new(),
                &mut parts,
                &credential(),
                &props(Arc::new(config())),
                None,
            )
            .await?;

        assert_eq!(parts.headers[X_AMZ_REGION_SET], "us-east-1");

        Ok(())
    }

    #[tokio::test]
    async fn test_presigned_skips_region_set_header() -> anyhow::Result<()> {
        let cfg = Arc::new(config());
        let props = props(cfg).with_signing_region_set(&["us-east-1", "us-west-2"]);

        let mut parts = request();
        SigV4aSigner::new()
            .sign(
                &Context::new(),
                &mut parts,
                &credential(),
                &props,
                Some(Duration::from_secs(3600)),
            )
            .await?;

        assert!(parts.headers.get(X_AMZ_REGION_SET).is_none());
        // The scope still carries the joined set.
        let query = parts.uri.query().unwrap();
        assert!(
            query.contains("us-east-1%2Cus-west-2"),
            "unexpected query: {query}"
        );

        Ok(())
    }
}
