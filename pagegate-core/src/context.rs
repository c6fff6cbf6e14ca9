//! Per-request state threaded from the inbound request into every gateway call.
//!
//! The facade never reads the caller's credential from ambient or global state. A
//! [`RequestContext`] is built once per inbound request and passed explicitly to each query.

use std::fmt;

/// Name of the header that carries the caller's credential, inbound and outbound.
pub const TOKEN_HEADER: &str = "Token";

/// An opaque bearer token identifying the caller.
///
/// The bytes are forwarded exactly as received. The facade never decodes, validates or
/// checks the expiry of a credential; that is the document service's job. `Debug` output
/// is redacted so credentials do not end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Vec<u8>);

impl Credential {
    /// Wraps raw credential bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the credential exactly as received.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns `true` if the credential is present but empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<{} bytes>)", self.0.len())
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&[u8]> for Credential {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

/// The state of a single inbound request.
///
/// A context without a credential is valid: the gateway forwards the absence and leaves any
/// authorization failure for the document service to report.
///
/// # Example
///
/// ```ignore
/// use pagegate_core::context::RequestContext;
///
/// let ctx = RequestContext::with_token("secret");
/// assert_eq!(ctx.credential().map(|c| c.as_bytes()), Some(&b"secret"[..]));
///
/// let anonymous = RequestContext::anonymous();
/// assert!(anonymous.credential().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    credential: Option<Credential>,
}

impl RequestContext {
    /// Creates a context from an optional credential.
    pub fn new(credential: Option<Credential>) -> Self {
        Self { credential }
    }

    /// Creates a context with no credential.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Creates a context carrying the given token.
    pub fn with_token(token: impl Into<Credential>) -> Self {
        Self::new(Some(token.into()))
    }

    /// Returns the caller's credential, if the inbound request carried one.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }
}
