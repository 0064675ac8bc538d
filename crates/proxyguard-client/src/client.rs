//! The HTTP client handed back by the factory.

use std::fmt;
use std::sync::Arc;

use reqwest::{Client, IntoUrl, Method, Request, RequestBuilder, Response};

use proxyguard_common::{ProviderIdentity, TransportOptions};

use crate::address::ProxyAddress;

/// How a client reaches its destinations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Connections are dialed straight to the destination.
    Direct,
    /// Connections are relayed through a SOCKS5 proxy.
    Socks5(ProxyAddress),
}

impl Route {
    /// Returns `true` if traffic goes through a proxy.
    #[must_use]
    pub const fn is_proxied(&self) -> bool {
        matches!(self, Self::Socks5(_))
    }

    /// The relay address, if proxied.
    #[must_use]
    pub const fn proxy_address(&self) -> Option<&ProxyAddress> {
        match self {
            Self::Direct => None,
            Self::Socks5(address) => Some(address),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Socks5(address) => write!(f, "socks5 via {address}"),
        }
    }
}

/// A ready-to-use HTTP client for one provider.
///
/// Owns its own connection pool. The route and options are fixed at
/// construction and exposed read-only. Cloning is cheap and clones share the
/// pool, so the client can be handed to many tasks.
#[derive(Clone)]
pub struct ProviderClient {
    inner: Client,
    identity: Arc<ProviderIdentity>,
    route: Route,
    options: Arc<TransportOptions>,
}

impl ProviderClient {
    pub(crate) fn new(
        inner: Client,
        identity: ProviderIdentity,
        route: Route,
        options: TransportOptions,
    ) -> Self {
        Self {
            inner,
            identity: Arc::new(identity),
            route,
            options: Arc::new(options),
        }
    }

    /// Provider this client was built for.
    #[must_use]
    pub fn identity(&self) -> &ProviderIdentity {
        &self.identity
    }

    /// How this client dials destinations.
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Pool and timeout settings the transport was built with.
    #[must_use]
    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    /// The underlying `reqwest` client.
    #[must_use]
    pub const fn inner(&self) -> &Client {
        &self.inner
    }

    /// Starts building a request with the given method.
    pub fn request<U: IntoUrl>(&self, method: Method, url: U) -> RequestBuilder {
        self.inner.request(method, url)
    }

    /// Makes a GET request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or times out.
    pub async fn get<U: IntoUrl>(&self, url: U) -> reqwest::Result<Response> {
        self.inner.get(url).send().await
    }

    /// Executes a prepared request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or times out.
    pub async fn execute(&self, request: Request) -> reqwest::Result<Response> {
        self.inner.execute(request).await
    }
}

impl fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderClient")
            .field("identity", &self.identity)
            .field("route", &self.route)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl From<ProviderClient> for Client {
    fn from(client: ProviderClient) -> Self {
        client.inner
    }
}
