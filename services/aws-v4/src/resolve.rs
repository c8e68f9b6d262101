use crate::region::{ProvideRegion, ProvideRegionInfo};
use crate::scheme::{AuthScheme, SchemeName};
use crate::sign_request::{RequestSigner, SignWith, SigningParams};
use crate::{Config, Credential};
use async_trait::async_trait;
use driftsign_core::{Context, Error, Result, SignRequest};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// The outcome of signer resolution: the underlying signer bound to the
/// signing identity it was resolved for.
#[derive(Debug, Clone)]
pub struct ResolvedSigner {
    /// The underlying signer to delegate to.
    pub signer: Arc<dyn SignWith>,
    /// The scheme the identity was resolved for.
    pub scheme: SchemeName,
    /// The region signatures are scoped to.
    pub signing_region: String,
    /// The service name signatures are scoped to.
    pub signing_name: String,
    /// The region set for multi-region signatures, when negotiated.
    pub signing_region_set: Option<Vec<String>>,
}

/// SignerResolver produces the signer for an auth scheme.
///
/// Resolution order:
///
/// 1. An explicit signer set by the caller is used as-is.
/// 2. A configured region-info provider may override the signing
///    region/name for the resolved region (legacy endpoint metadata).
/// 3. Otherwise the default sigv4 descriptor (service id + resolved region)
///    is merged with the scheme overrides negotiated during endpoint
///    resolution, and the built-in [`RequestSigner`] is used.
///
/// The resolved signing region/name pair is memoized: the first resolution
/// decides for the lifetime of the resolver, subsequent calls reuse it.
#[derive(Debug)]
pub struct SignerResolver {
    config: Arc<Config>,
    signer: Option<Arc<dyn SignWith>>,
    region_provider: Option<Arc<dyn ProvideRegion>>,
    region_info_provider: Option<Arc<dyn ProvideRegionInfo>>,

    identity: Mutex<Option<(String, String)>>,
}

impl SignerResolver {
    /// Create a new resolver over the client config.
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            signer: None,
            region_provider: None,
            region_info_provider: None,
            identity: Mutex::new(None),
        }
    }

    /// Supply an explicit underlying signer, used as-is for every scheme.
    pub fn with_signer(mut self, signer: impl SignWith) -> Self {
        self.signer = Some(Arc::new(signer));
        self
    }

    /// Configure an async region provider consulted when the config carries
    /// no region.
    pub fn with_region_provider(mut self, provider: impl ProvideRegion) -> Self {
        self.region_provider = Some(Arc::new(provider));
        self
    }

    /// Configure a region-info provider for legacy per-region signing
    /// metadata.
    pub fn with_region_info_provider(mut self, provider: impl ProvideRegionInfo) -> Self {
        self.region_info_provider = Some(Arc::new(provider));
        self
    }

    /// Resolve the signer for an auth scheme.
    ///
    /// `scheme` carries the overrides negotiated during endpoint resolution;
    /// `None` resolves the plain client default.
    pub async fn resolve(
        &self,
        ctx: &Context,
        scheme: Option<&AuthScheme>,
    ) -> Result<ResolvedSigner> {
        let (region, name) = self.signing_identity(ctx).await?;

        let mut merged = AuthScheme::sigv4_default(&name, &region);
        if let Some(overrides) = scheme {
            merged = merged.merge(overrides);
        }

        let signer = match &self.signer {
            Some(signer) => signer.clone(),
            None => Arc::new(RequestSigner::new()) as Arc<dyn SignWith>,
        };

        Ok(ResolvedSigner {
            signer,
            scheme: merged.name,
            signing_region: merged.signing_region.unwrap_or(region),
            signing_name: merged.signing_name.unwrap_or(name),
            signing_region_set: merged.signing_region_set,
        })
    }

    /// The memoized signing region/name pair for this client.
    async fn signing_identity(&self, ctx: &Context) -> Result<(String, String)> {
        if let Some(identity) = self.identity.lock().expect("lock poisoned").clone() {
            return Ok(identity);
        }

        let mut region = match &self.config.signing_region {
            Some(region) => region.clone(),
            None => self.resolve_region(ctx).await?,
        };
        let mut name = match self
            .config
            .signing_name
            .as_ref()
            .or(self.config.service.as_ref())
        {
            Some(name) => name.clone(),
            None => return Err(Error::config_invalid("signing name is not resolved")),
        };

        // Legacy endpoint metadata may override both.
        if let Some(provider) = &self.region_info_provider {
            if let Some(info) = provider.region_info(ctx, &region).await? {
                if let Some(r) = info.signing_region {
                    region = r;
                }
                if let Some(n) = info.signing_name {
                    name = n;
                }
            }
        }

        let identity = (region, name);
        *self.identity.lock().expect("lock poisoned") = Some(identity.clone());
        Ok(identity)
    }

    async fn resolve_region(&self, ctx: &Context) -> Result<String> {
        if let Some(region) = &self.config.region {
            return Ok(region.clone());
        }
        if let Some(provider) = &self.region_provider {
            if let Some(region) = provider.provide_region(ctx).await? {
                return Ok(region);
            }
        }

        Err(Error::config_invalid("signing region is not resolved"))
    }
}

#[async_trait]
impl SignRequest for SignerResolver {
    type Credential = Credential;

    async fn sign_request(
        &self,
        ctx: &Context,
        req: &mut http::request::Parts,
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        // Anonymous access: pass the request through unsigned.
        let Some(cred) = credential else {
            return Ok(());
        };

        let resolved = self.resolve(ctx, None).await?;

        let mut params = SigningParams::new(
            self.config.clock.now(),
            &resolved.signing_region,
            &resolved.signing_name,
        );
        if let Some(expires_in) = expires_in {
            params = params.with_expires_in(expires_in);
        }

        resolved.signer.sign_with(req, cred, &params).await
    }
}
