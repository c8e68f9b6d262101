use crate::scheme::{AuthScheme, SchemeName};
use crate::{Config, SignerResolver};
use driftsign_core::{Error, Result};
use std::sync::Arc;

/// The auth-scheme context a request negotiated during endpoint resolution.
///
/// Holds the scheme descriptors in preference order; the first entry drives
/// signer resolution.
#[derive(Debug, Clone, Default)]
pub struct SigningContext {
    auth_schemes: Vec<AuthScheme>,
}

impl SigningContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a negotiated auth scheme.
    pub fn with_auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.auth_schemes.push(scheme);
        self
    }

    /// The negotiated schemes, in preference order.
    pub fn auth_schemes(&self) -> &[AuthScheme] {
        &self.auth_schemes
    }

    /// The scheme driving signer resolution, if any.
    pub fn primary_scheme(&self) -> Option<&AuthScheme> {
        self.auth_schemes.first()
    }

    /// The scheme to sign with when a multi-region capable request
    /// negotiated down to single-region: exactly `[sigv4a, sigv4]` yields
    /// the second descriptor, whose identity must win.
    pub(crate) fn downgraded_scheme(&self) -> Option<&AuthScheme> {
        match self.auth_schemes.as_slice() {
            [first, second]
                if first.name == SchemeName::SigV4a && second.name == SchemeName::SigV4 =>
            {
                Some(second)
            }
            _ => None,
        }
    }
}

/// The transient, per-request bundle a scheme signer works from.
///
/// Created fresh per call and dropped afterwards; concurrent requests each
/// carry their own. The required pieces are the scheme context, the client
/// config and the signer resolver; each is checked individually so a
/// missing one fails with an error naming it.
#[derive(Debug, Clone, Default)]
pub struct SigningProperties {
    context: Option<SigningContext>,
    config: Option<Arc<Config>>,
    signer: Option<Arc<SignerResolver>>,

    signing_region: Option<String>,
    signing_name: Option<String>,
    signing_region_set: Option<Vec<String>>,
}

impl SigningProperties {
    /// Create an empty property bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the auth-scheme context.
    pub fn with_context(mut self, context: SigningContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Set the client config.
    pub fn with_config(mut self, config: Arc<Config>) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the signer resolver.
    pub fn with_signer(mut self, signer: Arc<SignerResolver>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Override the signing region for this request.
    pub fn with_signing_region(mut self, region: &str) -> Self {
        self.signing_region = Some(region.to_string());
        self
    }

    /// Override the signing name for this request.
    pub fn with_signing_name(mut self, name: &str) -> Self {
        self.signing_name = Some(name.to_string());
        self
    }

    /// Set the multi-region signing region set for this request.
    pub fn with_signing_region_set(mut self, set: &[&str]) -> Self {
        self.signing_region_set = Some(set.iter().map(|s| s.to_string()).collect());
        self
    }

    /// The per-request signing region override.
    pub fn signing_region(&self) -> Option<&str> {
        self.signing_region.as_deref()
    }

    /// The per-request signing name override.
    pub fn signing_name(&self) -> Option<&str> {
        self.signing_name.as_deref()
    }

    /// The per-request signing region set.
    pub fn signing_region_set(&self) -> Option<&[String]> {
        self.signing_region_set.as_deref()
    }

    /// Extract the required properties, failing fast with an error naming
    /// the first one that is absent.
    pub(crate) fn validated(&self) -> Result<Validated<'_>> {
        let context = self
            .context
            .as_ref()
            .ok_or_else(|| Error::config_invalid("signing property `context` is not resolved"))?;
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| Error::config_invalid("signing property `config` is not resolved"))?;
        let signer = self
            .signer
            .as_ref()
            .ok_or_else(|| Error::config_invalid("signing property `signer` is not resolved"))?;

        Ok(Validated {
            context,
            config,
            signer,
        })
    }
}

#[derive(Debug)]
pub(crate) struct Validated<'a> {
    pub context: &'a SigningContext,
    pub config: &'a Arc<Config>,
    pub signer: &'a Arc<SignerResolver>,
}
