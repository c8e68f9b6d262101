use std::fmt;

/// Named authentication schemes this crate can sign with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeName {
    /// Single-region SigV4.
    SigV4,
    /// Multi-region SigV4A, scoped to a signing region set.
    SigV4a,
}

impl SchemeName {
    /// The scheme id on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemeName::SigV4 => "sigv4",
            SchemeName::SigV4a => "sigv4a",
        }
    }
}

impl fmt::Display for SchemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An auth scheme descriptor, as negotiated during endpoint resolution.
///
/// A descriptor with unset fields is an override: merging it onto a default
/// descriptor replaces exactly the fields it carries. This keeps the
/// defaults-plus-overrides step an explicit field-by-field operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthScheme {
    /// The scheme to sign with.
    pub name: SchemeName,
    /// The region signatures are scoped to.
    pub signing_region: Option<String>,
    /// The service name signatures are scoped to.
    pub signing_name: Option<String>,
    /// The region set for multi-region signatures.
    pub signing_region_set: Option<Vec<String>>,
}

impl AuthScheme {
    /// Create a bare descriptor for the given scheme.
    pub fn new(name: SchemeName) -> Self {
        Self {
            name,
            signing_region: None,
            signing_name: None,
            signing_region_set: None,
        }
    }

    /// Set the signing region.
    pub fn with_signing_region(mut self, region: &str) -> Self {
        self.signing_region = Some(region.to_string());
        self
    }

    /// Set the signing name.
    pub fn with_signing_name(mut self, name: &str) -> Self {
        self.signing_name = Some(name.to_string());
        self
    }

    /// Set the signing region set.
    pub fn with_signing_region_set(mut self, set: &[&str]) -> Self {
        self.signing_region_set = Some(set.iter().map(|s| s.to_string()).collect());
        self
    }

    /// The default descriptor for a client: plain sigv4 scoped to the
    /// configured service and resolved region.
    pub fn sigv4_default(service: &str, region: &str) -> Self {
        Self::new(SchemeName::SigV4)
            .with_signing_name(service)
            .with_signing_region(region)
    }

    /// Apply the fields `overrides` carries onto this descriptor.
    pub fn merge(mut self, overrides: &AuthScheme) -> Self {
        self.name = overrides.name;
        if let Some(region) = &overrides.signing_region {
            self.signing_region = Some(region.clone());
        }
        if let Some(name) = &overrides.signing_name {
            self.signing_name = Some(name.clone());
        }
        if let Some(set) = &overrides.signing_region_set {
            self.signing_region_set = Some(set.clone());
        }
        self
    }
}
