//! Client factory: merges credentials with metadata, enforces strict mode, and
//! wires the transport.
//!
//! # Examples
//!
//! ```
//! use proxyguard_client::{ClientFactory, FactoryError, Route};
//! use proxyguard_common::{CredentialSettings, ProviderMetadata};
//!
//! let factory = ClientFactory::new();
//! let strict = ProviderMetadata::from(r#"{"reject_direct_connection":"true"}"#);
//!
//! // Strict metadata without a proxy is refused outright.
//! let err = factory
//!     .build("route53", &CredentialSettings::new(), &strict)
//!     .unwrap_err();
//! assert!(err.is_policy_violation());
//!
//! // Supplying a proxy satisfies the policy.
//! let creds = CredentialSettings::new().with("socks5_proxy", "127.0.0.1:1080");
//! let client = factory.build("route53", &creds, &strict)?;
//! assert!(client.route().is_proxied());
//! # Ok::<(), FactoryError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use log::debug;
use reqwest::Client;

use proxyguard_common::{
    CredentialSettings, DirectConnectionFlag, ProviderIdentity, ProviderMetadata,
    REJECT_DIRECT_CONNECTION_KEY, SOCKS5_PROXY_KEY, TransportOptions, TransportPolicy,
};

use crate::address::ProxyAddress;
use crate::client::{ProviderClient, Route};
use crate::error::FactoryError;
use crate::events::{EventSink, FactoryEvent, LogSink};

/// Builds [`ProviderClient`]s.
///
/// Holds no per-call state: every [`build`](Self::build) is independent, and a
/// single factory can be shared across threads.
#[derive(Clone)]
pub struct ClientFactory {
    options: TransportOptions,
    sink: Arc<dyn EventSink>,
}

impl Default for ClientFactory {
    fn default() -> Self {
        Self {
            options: TransportOptions::default(),
            sink: Arc::new(LogSink),
        }
    }
}

impl ClientFactory {
    /// Creates a factory with default transport options that logs via `log`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the transport options.
    #[must_use]
    pub fn with_options(mut self, options: TransportOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Replaces the event sink with a shared one.
    #[must_use]
    pub fn with_shared_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Transport options applied to every client.
    #[must_use]
    pub const fn options(&self) -> &TransportOptions {
        &self.options
    }

    /// Builds a client for `identity`.
    ///
    /// Resolves the proxy address from `credentials` and the strict-mode flag
    /// from `metadata`. Unreadable metadata counts as non-strict.
    ///
    /// # Errors
    ///
    /// - [`FactoryError::PolicyViolation`] if metadata rejects direct
    ///   connections and no proxy is configured
    /// - [`FactoryError::ProxySetup`] if the proxy address is unusable
    /// - [`FactoryError::ClientBuild`] if the HTTP stack fails to initialise
    pub fn build(
        &self,
        identity: impl Into<ProviderIdentity>,
        credentials: &CredentialSettings,
        metadata: &ProviderMetadata,
    ) -> Result<ProviderClient, FactoryError> {
        let identity = identity.into();
        let policy = TransportPolicy::resolve(credentials, metadata);

        debug!(
            "Resolved transport policy for {identity}: flag={}, proxy={}",
            policy.flag,
            policy.proxy_address().unwrap_or("<none>")
        );

        if policy.flag == DirectConnectionFlag::Unknown && !metadata.is_empty() {
            self.sink.record(&FactoryEvent::MetadataUnreadable {
                identity: identity.clone(),
            });
        }

        if policy.violates_strict_mode() {
            return Err(FactoryError::PolicyViolation {
                identity,
                flag: REJECT_DIRECT_CONNECTION_KEY,
                key: SOCKS5_PROXY_KEY,
            });
        }

        let builder = Client::builder()
            .pool_max_idle_per_host(self.options.max_idle_connections)
            .pool_idle_timeout(self.options.idle_timeout())
            .connect_timeout(self.options.tls_handshake_timeout())
            .timeout(self.options.request_timeout());

        let (builder, route) = match policy.proxy_address() {
            Some(raw) => {
                let proxy_setup = |source| FactoryError::ProxySetup {
                    identity: identity.clone(),
                    source,
                };
                let address = ProxyAddress::parse(raw).map_err(proxy_setup)?;
                let proxy = address.to_proxy().map_err(proxy_setup)?;
                (builder.proxy(proxy), Route::Socks5(address))
            }
            // Ignore HTTP_PROXY and friends: direct means direct.
            None => (builder.no_proxy(), Route::Direct),
        };

        let inner = builder.build().map_err(|source| FactoryError::ClientBuild {
            identity: identity.clone(),
            source,
        })?;

        let event = match &route {
            Route::Socks5(address) => FactoryEvent::Proxied {
                identity: identity.clone(),
                address: address.clone(),
            },
            Route::Direct => FactoryEvent::Direct {
                identity: identity.clone(),
            },
        };
        self.sink.record(&event);

        Ok(ProviderClient::new(
            inner,
            identity,
            route,
            self.options.clone(),
        ))
    }
}

impl fmt::Debug for ClientFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientFactory")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
