use crate::properties::SigningProperties;
use crate::sign_request::SigningParams;
use crate::Credential;
use driftsign_core::{Context, Result};
use http::request::Parts;
use std::time::Duration;

/// SigV4Signer signs a request under the `sigv4` auth scheme.
///
/// The signer itself is stateless: everything a signature needs arrives in
/// the per-request [`SigningProperties`]. The signing timestamp is read from
/// the client clock, so a previously observed server drift is already folded
/// in.
#[derive(Debug, Clone, Copy, Default)]
pub struct SigV4Signer;

impl SigV4Signer {
    /// Create a new sigv4 scheme signer.
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

        let mut region = props
            .signing_region()
            .unwrap_or(&resolved.signing_region)
            .to_string();
        let mut name = props
            .signing_name()
            .unwrap_or(&resolved.signing_name)
            .to_string();

        // A multi-region capable request that negotiated down to plain
        // sigv4 signs with the second scheme's identity, not its own.
        if let Some(scheme) = validated.context.downgraded_scheme() {
            if let Some(r) = &scheme.signing_region {
                region = r.clone();
            }
            if let Some(n) = &scheme.signing_name {
                name = n.clone();
            }
        }

        let mut params = SigningParams::new(validated.config.clock.now(), &region, &name);
        if let Some(expires_in) = expires_in {
            params = params.with_expires_in(expires_in);
        }

        resolved.signer.sign_with(req, credential, &params).await
    }
}
