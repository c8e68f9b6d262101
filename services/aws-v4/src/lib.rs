//! AWS SigV4 and SigV4A request signing with clock-drift correction.
//!
//! Signing timestamps are read from the [`Config`]'s
//! [`SystemClock`](driftsign_core::SystemClock), so a drift measured from a
//! server `Date` header is folded into every later signature.
//!
//! ```no_run
//! use driftsign_aws_v4::{Config, DefaultCredentialProvider, SignerResolver};
//! use driftsign_core::{Context, OsEnv, Signer};
//! use std::sync::Arc;
//!
//! # async fn example() -> driftsign_core::Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let config = Arc::new(
//!     Config {
//!         region: Some("us-east-1".to_string()),
//!         service: Some("s3".to_string()),
//!         ..Default::default()
//!     }
//!     .from_env(&ctx),
//! );
//!
//! let signer = Signer::new(
//!     ctx,
//!     DefaultCredentialProvider::new(config.clone()),
//!     SignerResolver::new(config.clone()),
//! );
//!
//! let mut parts = http::Request::builder()
//!     .method("GET")
//!     .uri("https://s3.amazonaws.com/testbucket")
//!     .body(())
//!     .unwrap()
//!     .into_parts()
//!     .0;
//! signer.sign(&mut parts, None).await?;
//!
//! // After dispatch, feed the response `Date` header back:
//! // config.clock.observe_headers(response.headers());
//! # Ok(())
//! # }
//! ```

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::ConfigCredentialProvider;
pub use provide_credential::DefaultCredentialProvider;
pub use provide_credential::EnvCredentialProvider;
pub use provide_credential::ProvideCredentialChain;
pub use provide_credential::StaticCredentialProvider;

mod region;
pub use region::EnvRegionProvider;
pub use region::ProvideRegion;
pub use region::ProvideRegionInfo;
pub use region::RegionInfo;
pub use region::StaticRegionInfoProvider;
pub use region::StaticRegionProvider;

mod scheme;
pub use scheme::AuthScheme;
pub use scheme::SchemeName;

mod properties;
pub use properties::SigningContext;
pub use properties::SigningProperties;

mod resolve;
pub use resolve::ResolvedSigner;
pub use resolve::SignerResolver;

mod sign_request;
pub use sign_request::RequestSigner;
pub use sign_request::SignWith;
pub use sign_request::SigningParams;

mod sigv4;
pub use sigv4::SigV4Signer;

mod sigv4a;
pub use sigv4a::SigV4aSigner;

mod constants;
