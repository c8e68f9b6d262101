//! Core components for signing API requests with clock-drift correction.
//!
//! This crate provides the foundational types and traits for the driftsign
//! ecosystem. It defines the seams that let a service crate plug in its own
//! credentials and signature algorithm while sharing one signing substrate.
//!
//! ## Overview
//!
//! The crate is built around a few key concepts:
//!
//! - **Context**: the execution environment handed to credential and region
//!   providers, so nothing reads process state ambiently
//! - **Traits**: [`ProvideCredential`] for credential loading and
//!   [`SignRequest`] for service-specific signing
//! - **Signer**: the orchestrator that memoizes the credential and drives
//!   the signing trait
//! - **SystemClock**: a shared, skew-corrected clock; signing timestamps
//!   come from it so signatures stay valid even when the local clock drifts
//!   from the service's
//!
//! ## Example
//!
//! ```no_run
//! use anyhow::Result;
//! use async_trait::async_trait;
//! use driftsign_core::{
//!     Context, ProvideCredential, SignRequest, Signer, SigningCredential,
//! };
//! use std::time::Duration;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//!     secret: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty() && !self.secret.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyProvider;
//!
//! #[async_trait]
//! impl ProvideCredential for MyProvider {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(
//!         &self,
//!         _: &Context,
//!     ) -> driftsign_core::Result<Option<Self::Credential>> {
//!         Ok(Some(MyCredential {
//!             key: "my-access-key".to_string(),
//!             secret: "my-secret-key".to_string(),
//!         }))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MySigner;
//!
//! #[async_trait]
//! impl SignRequest for MySigner {
//!     type Credential = MyCredential;
//!
//!     async fn sign_request(
//!         &self,
//!         _ctx: &Context,
//!         _req: &mut http::request::Parts,
//!         _credential: Option<&Self::Credential>,
//!         _expires_in: Option<Duration>,
//!     ) -> driftsign_core::Result<()> {
//!         // Build your signature here
//!         todo!()
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let signer = Signer::new(Context::default(), MyProvider, MySigner);
//!
//! let mut parts = http::Request::builder()
//!     .method("GET")
//!     .uri("https://example.com")
//!     .body(())
//!     .unwrap()
//!     .into_parts()
//!     .0;
//!
//! signer.sign(&mut parts, None).await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod clock;
pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::Context;
pub use context::Env;
pub use context::NoopEnv;
pub use context::OsEnv;
pub use context::StaticEnv;

mod error;
pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod request;
pub use request::SigningRequest;
mod signer;
pub use signer::Signer;

pub use clock::SystemClock;
