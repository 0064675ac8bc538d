//! Transport tuning options.
//!
//! The defaults are the fixed values every client gets unless a caller
//! explicitly overrides them. All fields carry serde defaults so a partial TOML
//! table deserializes cleanly.
//!
//! ```toml
//! max_idle_connections = 100
//! idle_timeout_secs = 90
//! tls_handshake_timeout_secs = 10
//! request_timeout_secs = 120
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Pool and timeout settings applied to every constructed transport.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use proxyguard_common::TransportOptions;
///
/// let options = TransportOptions::builder().request_timeout_secs(30).build();
/// assert_eq!(options.request_timeout(), Duration::from_secs(30));
/// assert_eq!(options.max_idle_connections, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
pub struct TransportOptions {
    /// Maximum idle connections kept in the pool for each host.
    ///
    /// The HTTP stack only caps idle connections per host, so this is not a
    /// total across hosts. A client usually talks to one provider host (or one
    /// relay), where the two coincide.
    #[serde(default = "default_max_idle_connections")]
    #[builder(default = default_max_idle_connections())]
    pub max_idle_connections: usize,

    /// How long an idle pooled connection is kept, in seconds.
    #[serde(default = "default_idle_timeout_secs")]
    #[builder(default = default_idle_timeout_secs())]
    pub idle_timeout_secs: u64,

    /// Upper bound on connection setup including the TLS handshake, in seconds.
    #[serde(default = "default_tls_handshake_timeout_secs")]
    #[builder(default = default_tls_handshake_timeout_secs())]
    pub tls_handshake_timeout_secs: u64,

    /// Overall per-request timeout, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    #[builder(default = default_request_timeout_secs())]
    pub request_timeout_secs: u64,
}

const fn default_max_idle_connections() -> usize {
    100
}

const fn default_idle_timeout_secs() -> u64 {
    90
}

const fn default_tls_handshake_timeout_secs() -> u64 {
    10
}

const fn default_request_timeout_secs() -> u64 {
    120 // 2 minutes
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            max_idle_connections: default_max_idle_connections(),
            idle_timeout_secs: default_idle_timeout_secs(),
            tls_handshake_timeout_secs: default_tls_handshake_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl TransportOptions {
    /// Idle connection timeout as a [`Duration`].
    #[must_use]
    pub const fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// TLS handshake bound as a [`Duration`].
    #[must_use]
    pub const fn tls_handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.tls_handshake_timeout_secs)
    }

    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_defaults() {
        let options = TransportOptions::default();
        assert_eq!(options.max_idle_connections, 100);
        assert_eq!(options.idle_timeout(), Duration::from_secs(90));
        assert_eq!(options.tls_handshake_timeout(), Duration::from_secs(10));
        assert_eq!(options.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_builder_defaults_match_default() {
        assert_eq!(TransportOptions::builder().build(), TransportOptions::default());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let options: TransportOptions = toml::from_str("request_timeout_secs = 5").unwrap();
        assert_eq!(options.request_timeout(), Duration::from_secs(5));
        assert_eq!(options.max_idle_connections, 100);
        assert_eq!(options.idle_timeout_secs, 90);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let options: TransportOptions = toml::from_str("").unwrap();
        assert_eq!(options, TransportOptions::default());
    }
}
