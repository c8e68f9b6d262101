use crate::constants::{
    QUERY_ENCODE_SET, URI_ENCODE_SET, X_AMZ_CONTENT_SHA_256, X_AMZ_DATE, X_AMZ_SECURITY_TOKEN,
};
use crate::Credential;
use async_trait::async_trait;
use driftsign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use driftsign_core::time::{format_date, format_iso8601, DateTime};
use driftsign_core::{Result, SigningRequest};
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use std::fmt::Debug;
use std::fmt::Write;
use std::time::Duration;

/// The resolved parameters one signature is computed from.
///
/// Scheme signers fill this in: the signing time comes from the
/// skew-corrected clock, the region and name from signing-properties
/// resolution. The region is an opaque string as far as the signature is
/// concerned, so a comma-joined region set passes through untouched.
#[derive(Debug, Clone)]
pub struct SigningParams {
    /// The timestamp embedded in the signature.
    pub signing_time: DateTime,
    /// The region (or joined region set) inside the credential scope.
    pub signing_region: String,
    /// The service name inside the credential scope.
    pub signing_name: String,
    /// When set, produce a presigned query instead of an Authorization
    /// header.
    pub expires_in: Option<Duration>,
}

impl SigningParams {
    /// Create signing params for a header-signed request.
    pub fn new(signing_time: DateTime, signing_region: &str, signing_name: &str) -> Self {
        Self {
            signing_time,
            signing_region: signing_region.to_string(),
            signing_name: signing_name.to_string(),
            expires_in: None,
        }
    }

    /// Bound the signature by an expiry, switching to the presigned form.
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = Some(expires_in);
        self
    }
}

/// The underlying signer contract: turn resolved parameters into a signed
/// request.
///
/// [`RequestSigner`] is the built-in SigV4 implementation. An embedder with
/// its own signature implementation (an ECDSA multi-region signer, a
/// hardware-backed one) plugs it in through
/// [`crate::SignerResolver::with_signer`].
#[async_trait]
pub trait SignWith: Debug + Send + Sync + 'static {
    /// Sign the request parts with the given credential and parameters.
    async fn sign_with(
        &self,
        req: &mut Parts,
        credential: &Credential,
        params: &SigningParams,
    ) -> Result<()>;
}

/// RequestSigner implements AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSigner;

impl RequestSigner {
    /// Create a new SigV4 request signer.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SignWith for RequestSigner {
    async fn sign_with(
        &self,
        req: &mut Parts,
        credential: &Credential,
        params: &SigningParams,
    ) -> Result<()> {
        let mut signing_req = SigningRequest::build(req)?;

        // canonicalize context
        canonicalize_header(&mut signing_req, credential, params)?;
        canonicalize_query(&mut signing_req, credential, params)?;

        // build canonical request and string to sign.
        let creq = canonical_request_string(&signing_req)?;
        debug!("calculated canonical request: {creq}");

        // Scope: "20220313/<region>/<service>/aws4_request"
        let scope = format!(
            "{}/{}/{}/aws4_request",
            format_date(params.signing_time),
            params.signing_region,
            params.signing_name
        );

        // StringToSign:
        //
        // AWS4-HMAC-SHA256
        // 20220313T072004Z
        // 20220313/<region>/<service>/aws4_request
        // <hashed_canonical_request>
        let string_to_sign = {
            let mut f = String::new();
            writeln!(f, "AWS4-HMAC-SHA256")?;
            writeln!(f, "{}", format_iso8601(params.signing_time))?;
            writeln!(f, "{}", &scope)?;
            write!(f, "{}", hex_sha256(creq.as_bytes()))?;
            f
        };
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = generate_signing_key(
            &credential.secret_access_key,
            params.signing_time,
            &params.signing_region,
            &params.signing_name,
        );
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        if params.expires_in.is_some() {
            signing_req.query_push("X-Amz-Signature", signature);
        } else {
            let mut authorization = HeaderValue::from_str(&format!(
                "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
                credential.access_key_id,
                scope,
                signing_req.header_name_to_vec_sorted().join(";"),
                signature
            ))?;
            authorization.set_sensitive(true);

            signing_req
                .headers
                .insert(header::AUTHORIZATION, authorization);
        }

        // Apply to the request.
        signing_req.apply(req)
    }
}

fn canonical_request_string(req: &SigningRequest) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    // Insert method
    writeln!(f, "{}", req.method)?;

    // Insert encoded path
    let path = percent_decode_str(&req.path)
        .decode_utf8()
        .map_err(|e| driftsign_core::Error::request_invalid(format!("invalid path: {e}")))?;
    writeln!(f, "{}", utf8_percent_encode(&path, &URI_ENCODE_SET))?;

    // Insert query
    writeln!(
        f,
        "{}",
        req.query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    )?;

    // Insert signed headers
    let signed_headers = req.header_name_to_vec_sorted();
    for name in signed_headers.iter() {
        writeln!(f, "{}:{}", name, req.headers[*name].to_str()?)?;
    }
    writeln!(f)?;
    writeln!(f, "{}", signed_headers.join(";"))?;

    match req.headers.get(X_AMZ_CONTENT_SHA_256) {
        Some(v) => write!(f, "{}", v.to_str()?)?,
        None => write!(f, "UNSIGNED-PAYLOAD")?,
    }

    Ok(f)
}

fn canonicalize_header(
    req: &mut SigningRequest,
    credential: &Credential,
    params: &SigningParams,
) -> Result<()> {
    // Header names and values need to be normalized according to Step 4 of https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html
    for (_, value) in req.headers.iter_mut() {
        SigningRequest::header_value_normalize(value)
    }

    // Insert HOST header if not present.
    if req.headers.get(header::HOST).is_none() {
        let host = req.authority.as_str().parse()?;
        req.headers.insert(header::HOST, host);
    }

    if params.expires_in.is_none() {
        // Insert DATE header if not present.
        if req.headers.get(X_AMZ_DATE).is_none() {
            let date_header = HeaderValue::try_from(format_iso8601(params.signing_time))?;
            req.headers.insert(X_AMZ_DATE, date_header);
        }

        // Insert X_AMZ_CONTENT_SHA_256 header if not present.
        if req.headers.get(X_AMZ_CONTENT_SHA_256).is_none() {
            req.headers.insert(
                X_AMZ_CONTENT_SHA_256,
                HeaderValue::from_static("UNSIGNED-PAYLOAD"),
            );
        }

        // Insert X_AMZ_SECURITY_TOKEN header if security token exists.
        if let Some(token) = &credential.session_token {
            let mut value = HeaderValue::from_str(token)?;
            // Set token value sensitive to avoid leaking.
            value.set_sensitive(true);

            req.headers.insert(X_AMZ_SECURITY_TOKEN, value);
        }
    }

    Ok(())
}

fn canonicalize_query(
    req: &mut SigningRequest,
    credential: &Credential,
    params: &SigningParams,
) -> Result<()> {
    if let Some(expire) = params.expires_in {
        req.query_push("X-Amz-Algorithm", "AWS4-HMAC-SHA256");
        req.query_push(
            "X-Amz-Credential",
            format!(
                "{}/{}/{}/{}/aws4_request",
                credential.access_key_id,
                format_date(params.signing_time),
                params.signing_region,
                params.signing_name
            ),
        );
        req.query_push("X-Amz-Date", format_iso8601(params.signing_time));
        req.query_push("X-Amz-Expires", expire.as_secs().to_string());
        req.query_push(
            "X-Amz-SignedHeaders",
            req.header_name_to_vec_sorted().join(";"),
        );

        if let Some(token) = &credential.session_token {
            req.query_push("X-Amz-Security-Token", token.as_str());
        }
    }

    // Return if query is empty.
    if req.query.is_empty() {
        return Ok(());
    }

    // Sort by param name
    req.query.sort();

    req.query = req
        .query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect();

    Ok(())
}

fn generate_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), "aws4_request".as_bytes())
}
