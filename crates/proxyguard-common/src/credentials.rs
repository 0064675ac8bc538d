//! Credential settings supplied by the caller.
//!
//! The credential store is loaded elsewhere; this module only holds the
//! already-loaded key/value pairs and exposes the one key the transport cares
//! about.

use std::collections::HashMap;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Credential key holding the SOCKS5 proxy address (`host:port`).
pub const SOCKS5_PROXY_KEY: &str = "socks5_proxy";

/// String-to-string credential mapping for a single provider.
///
/// Values are stored as [`SecretString`] because credential stores routinely
/// mix API tokens with transport settings. `Debug` output lists keys only.
///
/// # Examples
///
/// ```
/// use proxyguard_common::CredentialSettings;
///
/// let creds = CredentialSettings::new()
///     .with("socks5_proxy", "127.0.0.1:1080")
///     .with("api_token", "s3cr3t");
///
/// assert_eq!(creds.socks5_proxy(), Some("127.0.0.1:1080"));
/// assert!(!format!("{creds:?}").contains("s3cr3t"));
/// ```
#[derive(Clone, Default)]
pub struct CredentialSettings {
    values: HashMap<String, SecretString>,
}

impl CredentialSettings {
    /// Creates an empty credential mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a value, returning the updated mapping.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds or replaces a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value: String = value.into();
        self.values
            .insert(key.into(), SecretString::new(value.into_boxed_str()));
    }

    /// Returns the raw value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|secret| secret.expose_secret())
    }

    /// Returns the configured SOCKS5 proxy address.
    ///
    /// A missing key and an empty value are indistinguishable: both yield `None`.
    #[must_use]
    pub fn socks5_proxy(&self) -> Option<&str> {
        self.get(SOCKS5_PROXY_KEY).filter(|value| !value.is_empty())
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for CredentialSettings
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut settings = Self::new();
        for (key, value) in iter {
            settings.insert(key, value);
        }
        settings
    }
}

impl From<HashMap<String, String>> for CredentialSettings {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl fmt::Debug for CredentialSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("CredentialSettings")
            .field("keys", &keys)
            .finish_non_exhaustive()
    }
}
