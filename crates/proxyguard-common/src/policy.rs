//! Transport policy resolved from credentials and metadata.

use crate::credentials::CredentialSettings;
use crate::metadata::{DirectConnectionFlag, ProviderMetadata};

/// Outcome of merging credentials with metadata for a single construction.
///
/// Transient: computed once per factory call and dropped with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportPolicy {
    /// Direct-connection flag as read from metadata.
    pub flag: DirectConnectionFlag,
    /// Proxy address from credentials, `None` when missing or empty.
    pub proxy_address: Option<String>,
}

impl TransportPolicy {
    /// Resolves the policy from its two sources.
    ///
    /// # Examples
    ///
    /// ```
    /// use proxyguard_common::{CredentialSettings, ProviderMetadata, TransportPolicy};
    ///
    /// let creds = CredentialSettings::new();
    /// let meta = ProviderMetadata::from(r#"{"reject_direct_connection":"true"}"#);
    ///
    /// let policy = TransportPolicy::resolve(&creds, &meta);
    /// assert!(policy.strict_mode());
    /// assert!(policy.violates_strict_mode());
    /// ```
    #[must_use]
    pub fn resolve(credentials: &CredentialSettings, metadata: &ProviderMetadata) -> Self {
        Self {
            flag: metadata.direct_connection_flag(),
            proxy_address: credentials.socks5_proxy().map(str::to_owned),
        }
    }

    /// Whether direct connections are forbidden.
    #[must_use]
    pub const fn strict_mode(&self) -> bool {
        self.flag.is_strict()
    }

    /// The proxy address, if one is configured.
    #[must_use]
    pub fn proxy_address(&self) -> Option<&str> {
        self.proxy_address.as_deref()
    }

    /// Returns `true` when strict mode is on and no proxy is configured.
    ///
    /// A client must never be built from a policy for which this holds.
    #[must_use]
    pub const fn violates_strict_mode(&self) -> bool {
        self.strict_mode() && self.proxy_address.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::SOCKS5_PROXY_KEY;

    const STRICT: &str = r#"{"reject_direct_connection":"true"}"#;

    #[test]
    fn test_empty_inputs_are_direct_and_lenient() {
        let policy =
            TransportPolicy::resolve(&CredentialSettings::new(), &ProviderMetadata::from("{}"));
        assert!(!policy.strict_mode());
        assert_eq!(policy.proxy_address(), None);
        assert!(!policy.violates_strict_mode());
    }

    #[test]
    fn test_strict_with_proxy_is_satisfied() {
        let creds = CredentialSettings::new().with(SOCKS5_PROXY_KEY, "127.0.0.1:1080");
        let policy = TransportPolicy::resolve(&creds, &ProviderMetadata::from(STRICT));
        assert!(policy.strict_mode());
        assert_eq!(policy.proxy_address(), Some("127.0.0.1:1080"));
        assert!(!policy.violates_strict_mode());
    }

    #[test]
    fn test_strict_without_proxy_violates() {
        let policy =
            TransportPolicy::resolve(&CredentialSettings::new(), &ProviderMetadata::from(STRICT));
        assert!(policy.violates_strict_mode());
    }

    #[test]
    fn test_strict_with_empty_proxy_violates() {
        let creds = CredentialSettings::new().with(SOCKS5_PROXY_KEY, "");
        let policy = TransportPolicy::resolve(&creds, &ProviderMetadata::from(STRICT));
        assert!(policy.violates_strict_mode());
    }

    #[test]
    fn test_unknown_flag_is_not_strict() {
        let policy = TransportPolicy::resolve(
            &CredentialSettings::new(),
            &ProviderMetadata::from("not valid structured data"),
        );
        assert_eq!(policy.flag, DirectConnectionFlag::Unknown);
        assert!(!policy.violates_strict_mode());
    }
}
