use crate::constants::{AWS_DEFAULT_REGION, AWS_REGION};
use async_trait::async_trait;
use driftsign_core::{Context, Result};
use std::fmt::Debug;

/// ProvideRegion resolves the region requests are signed for.
///
/// Mirrors [`driftsign_core::ProvideCredential`]: async, context-driven, and
/// `Ok(None)` when this source has nothing to offer.
#[async_trait]
pub trait ProvideRegion: Debug + Send + Sync + Unpin + 'static {
    /// Resolve the region from the context.
    async fn provide_region(&self, ctx: &Context) -> Result<Option<String>>;
}

/// StaticRegionProvider always returns a fixed region.
#[derive(Debug, Clone)]
pub struct StaticRegionProvider {
    region: String,
}

impl StaticRegionProvider {
    /// Create a new StaticRegionProvider.
    pub fn new(region: &str) -> Self {
        Self {
            region: region.to_string(),
        }
    }
}

#[async_trait]
impl ProvideRegion for StaticRegionProvider {
    async fn provide_region(&self, _: &Context) -> Result<Option<String>> {
        Ok(Some(self.region.clone()))
    }
}

/// EnvRegionProvider loads the region from environment variables.
///
/// `AWS_REGION` wins over `AWS_DEFAULT_REGION`.
#[derive(Debug, Clone, Default)]
pub struct EnvRegionProvider;

impl EnvRegionProvider {
    /// Create a new EnvRegionProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideRegion for EnvRegionProvider {
    async fn provide_region(&self, ctx: &Context) -> Result<Option<String>> {
        Ok(ctx
            .env_var(AWS_REGION)
            .or_else(|| ctx.env_var(AWS_DEFAULT_REGION)))
    }
}

/// Per-region signing metadata for services whose signing identity differs
/// from the client region, kept for legacy endpoint layouts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionInfo {
    /// The region signatures must be scoped to, when it differs from the
    /// resolved client region.
    pub signing_region: Option<String>,
    /// The service name signatures must be scoped to, when it differs from
    /// the configured service id.
    pub signing_name: Option<String>,
}

/// ProvideRegionInfo answers signing metadata lookups for a region.
#[async_trait]
pub trait ProvideRegionInfo: Debug + Send + Sync + Unpin + 'static {
    /// Return signing metadata for the given region.
    async fn region_info(&self, ctx: &Context, region: &str) -> Result<Option<RegionInfo>>;
}

/// StaticRegionInfoProvider serves fixed signing metadata.
#[derive(Debug, Clone, Default)]
pub struct StaticRegionInfoProvider {
    info: RegionInfo,
}

impl StaticRegionInfoProvider {
    /// Create a provider serving the given metadata.
    pub fn new(info: RegionInfo) -> Self {
        Self { info }
    }
}

#[async_trait]
impl ProvideRegionInfo for StaticRegionInfoProvider {
    async fn region_info(&self, _: &Context, _: &str) -> Result<Option<RegionInfo>> {
        Ok(Some(self.info.clone()))
    }
}
