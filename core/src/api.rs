use crate::Context;
use crate::Result;
use std::fmt::Debug;
use std::time::Duration;

/// SigningCredential is the trait used by signer as the signing key.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is still valid for signing.
    fn is_valid(&self) -> bool;
}

impl<T: SigningCredential> SigningCredential for Option<T> {
    fn is_valid(&self) -> bool {
        let Some(cred) = self else {
            return false;
        };

        cred.is_valid()
    }
}

/// ProvideCredential loads a credential from the environment.
///
/// Services require different credentials to sign requests: access key and
/// secret key pairs, bearer tokens, and so on. Providers are expected to be
/// cheap to call repeatedly; the [`crate::Signer`] memoizes the returned
/// credential until it stops being valid.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this provider.
    type Credential: SigningCredential;

    /// Load the credential from the context.
    ///
    /// Returns `Ok(None)` when this source has nothing to offer; the caller
    /// decides whether that means anonymous access or trying another source.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}

/// SignRequest signs an HTTP request in place.
#[async_trait::async_trait]
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Credential used by this signer.
    type Credential: SigningCredential;

    /// Sign the request parts.
    ///
    /// ## Credential
    ///
    /// `None` means no credential could be resolved; implementations decide
    /// whether to pass the request through unsigned (anonymous access) or to
    /// fail.
    ///
    /// ## Expires In
    ///
    /// When set, produce a presigned request valid for the given duration
    /// instead of an Authorization header. Implementations without a
    /// presigned form should return an error.
    async fn sign_request(
        &self,
        ctx: &Context,
        req: &mut http::request::Parts,
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> Result<()>;
}
