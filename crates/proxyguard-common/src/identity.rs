use std::fmt;

use serde::{Deserialize, Serialize};

/// Caller-supplied label naming the provider a client is built for.
///
/// Used verbatim in diagnostics and error messages. It is never validated,
/// looked up, or required to be unique; an empty label is accepted.
///
/// # Examples
///
/// ```
/// use proxyguard_common::ProviderIdentity;
///
/// let identity = ProviderIdentity::from("cloudflare");
/// assert_eq!(identity.to_string(), "cloudflare");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderIdentity(String);

impl ProviderIdentity {
    /// Creates an identity from any string-like label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderIdentity {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for ProviderIdentity {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl AsRef<str> for ProviderIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_identity_is_allowed() {
        let identity = ProviderIdentity::new("");
        assert_eq!(identity.as_str(), "");
        assert_eq!(identity, ProviderIdentity::default());
    }

    #[test]
    fn test_identity_displays_verbatim() {
        let identity = ProviderIdentity::from(String::from("  route53 (prod) "));
        assert_eq!(format!("[{identity}]"), "[  route53 (prod) ]");
    }
}
