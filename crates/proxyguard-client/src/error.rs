//! Error types for client construction.

use proxyguard_common::ProviderIdentity;
use thiserror::Error;

/// Reasons a SOCKS5 proxy address cannot be used.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProxyAddressError {
    /// The address string is empty.
    #[error("proxy address is empty")]
    Empty,

    /// The host part is empty.
    #[error("missing host in proxy address {0:?}")]
    MissingHost(String),

    /// No `:port` suffix was found.
    #[error("missing port in proxy address {0:?}")]
    MissingPort(String),

    /// The port is not a number in `0..=65535`.
    #[error("invalid port in proxy address {address:?}: {source}")]
    InvalidPort {
        /// The full address as supplied.
        address: String,
        /// Underlying cause.
        #[source]
        source: url::ParseError,
    },

    /// The host is not a valid name or IP literal.
    #[error("invalid host in proxy address {address:?}: {source}")]
    InvalidHost {
        /// The full address as supplied.
        address: String,
        /// Underlying cause.
        #[source]
        source: url::ParseError,
    },

    /// The address could not be read as `host:port` at all.
    #[error("malformed proxy address {address:?}: {source}")]
    Malformed {
        /// The full address as supplied.
        address: String,
        /// Underlying cause.
        #[source]
        source: url::ParseError,
    },

    /// The address carries more than `host:port`.
    #[error("proxy address {address:?} must be plain host:port, found {component}")]
    UnexpectedComponent {
        /// The full address as supplied.
        address: String,
        /// What was found besides host and port.
        component: &'static str,
    },

    /// The HTTP stack rejected the proxy.
    #[error("SOCKS5 dialer rejected proxy: {0}")]
    Dialer(#[source] reqwest::Error),
}

/// Errors that can occur while building a provider client.
///
/// All variants are terminal: retrying with the same inputs yields the same
/// error, so none are reported as retryable.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FactoryError {
    /// Metadata forbids direct connections but no proxy is configured.
    #[error(
        "security policy violation for provider '{identity}': metadata sets '{flag}' \
         but credential '{key}' is not configured; direct connection refused"
    )]
    PolicyViolation {
        /// Provider the client was requested for.
        identity: ProviderIdentity,
        /// Name of the metadata flag demanding a proxy.
        flag: &'static str,
        /// Name of the missing credential key.
        key: &'static str,
    },

    /// The configured proxy address cannot be turned into a SOCKS5 dialer.
    #[error("failed to set up SOCKS5 proxy for provider '{identity}': {source}")]
    ProxySetup {
        /// Provider the client was requested for.
        identity: ProviderIdentity,
        /// Underlying cause.
        #[source]
        source: ProxyAddressError,
    },

    /// The HTTP client itself failed to initialise (for example the TLS backend).
    #[error("failed to build HTTP client for provider '{identity}': {source}")]
    ClientBuild {
        /// Provider the client was requested for.
        identity: ProviderIdentity,
        /// Underlying cause.
        #[source]
        source: reqwest::Error,
    },
}

impl FactoryError {
    /// Construction errors are never retryable.
    pub const fn is_retryable(&self) -> bool {
        false
    }

    /// Check if this is a strict-mode policy violation.
    pub const fn is_policy_violation(&self) -> bool {
        matches!(self, Self::PolicyViolation { .. })
    }

    /// Check if this is a proxy setup failure.
    pub const fn is_proxy_setup_error(&self) -> bool {
        matches!(self, Self::ProxySetup { .. })
    }

    /// The provider identity the failed construction was for.
    pub const fn identity(&self) -> &ProviderIdentity {
        match self {
            Self::PolicyViolation { identity, .. }
            | Self::ProxySetup { identity, .. }
            | Self::ClientBuild { identity, .. } => identity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxyguard_common::{REJECT_DIRECT_CONNECTION_KEY, SOCKS5_PROXY_KEY};
    use std::error::Error as _;

    #[test]
    fn test_policy_violation_message_names_everything() {
        let err = FactoryError::PolicyViolation {
            identity: ProviderIdentity::from("gcloud"),
            flag: REJECT_DIRECT_CONNECTION_KEY,
            key: SOCKS5_PROXY_KEY,
        };
        let message = err.to_string();

        assert!(message.contains("gcloud"));
        assert!(message.contains("reject_direct_connection"));
        assert!(message.contains("socks5_proxy"));
        assert!(err.is_policy_violation());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_proxy_setup_keeps_source() {
        let err = FactoryError::ProxySetup {
            identity: ProviderIdentity::from("ovh"),
            source: ProxyAddressError::MissingPort("localhost".to_string()),
        };

        assert!(err.is_proxy_setup_error());
        assert!(!err.is_retryable());
        assert_eq!(err.identity().as_str(), "ovh");
        assert!(err.to_string().contains("missing port"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_unexpected_component_names_it() {
        let err = ProxyAddressError::UnexpectedComponent {
            address: "user@host:1080".to_string(),
            component: "credentials",
        };
        assert!(err.to_string().contains("credentials"));
        assert!(err.to_string().contains("user@host:1080"));
    }
}
