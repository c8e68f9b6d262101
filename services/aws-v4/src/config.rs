use crate::constants::*;
use driftsign_core::utils::Redact;
use driftsign_core::{Context, SystemClock};
use std::fmt::{Debug, Formatter};

/// Config carries the client-level signing configuration.
///
/// One `Config` belongs to one logical client and is shared by `Arc` with
/// every provider, resolver and signer built from it. All fields are set up
/// front; the only mutable member is [`Config::clock`], whose offset is
/// updated by the clock-skew corrector as server timestamps are observed.
#[derive(Clone, Default)]
pub struct Config {
    /// `access_key_id` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SECRET_ACCESS_KEY`]
    pub secret_access_key: Option<String>,
    /// `session_token` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SESSION_TOKEN`]
    pub session_token: Option<String>,

    /// `region` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_REGION`], falling back to [`AWS_DEFAULT_REGION`]
    /// - a configured region provider, at resolution time
    pub region: Option<String>,
    /// The service id requests are signed for, e.g. `s3`.
    ///
    /// Used as the signing name unless [`Config::signing_name`] overrides it.
    pub service: Option<String>,
    /// Overrides the region used inside the credential scope.
    pub signing_region: Option<String>,
    /// Overrides the service name used inside the credential scope.
    pub signing_name: Option<String>,
    /// The multi-region signing region set, e.g. `["us-east-1", "us-west-2"]`.
    ///
    /// Will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SIGV4A_SIGNING_REGION_SET`], comma separated
    pub signing_region_set: Option<Vec<String>>,

    /// The skew-corrected clock every signing timestamp is read from.
    ///
    /// Starts at offset zero; hand a pre-measured offset to
    /// [`SystemClock::with_offset`] to carry one over from a previous
    /// client.
    pub clock: SystemClock,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .field("region", &self.region)
            .field("service", &self.service)
            .field("signing_region", &self.signing_region)
            .field("signing_name", &self.signing_name)
            .field("signing_region_set", &self.signing_region_set)
            .field("clock", &self.clock)
            .finish()
    }
}

impl Config {
    /// Load config from env vars carried by the context.
    ///
    /// Values already present on the config win over the environment.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let envs = ctx.env_vars();

        if self.access_key_id.is_none() {
            self.access_key_id = envs.get(AWS_ACCESS_KEY_ID).cloned();
        }
        if self.secret_access_key.is_none() {
            self.secret_access_key = envs.get(AWS_SECRET_ACCESS_KEY).cloned();
        }
        if self.session_token.is_none() {
            self.session_token = envs.get(AWS_SESSION_TOKEN).cloned();
        }
        if self.region.is_none() {
            self.region = envs
                .get(AWS_REGION)
                .or_else(|| envs.get(AWS_DEFAULT_REGION))
                .cloned();
        }
        if self.signing_region_set.is_none() {
            self.signing_region_set = envs.get(AWS_SIGV4A_SIGNING_REGION_SET).map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            });
        }

        self
    }
}
