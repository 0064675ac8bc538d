//! SOCKS5 proxy address parsing.

use std::fmt;
use std::str::FromStr;

use reqwest::Proxy;
use url::{Host, ParseError, Url};

use crate::error::ProxyAddressError;

const SCHEME: &str = "socks5h";

/// A validated `host:port` SOCKS5 relay address.
///
/// IPv6 hosts must be written in brackets (`[::1]:1080`). Any port, including
/// `0`, is accepted as written; the relay is not contacted until a request is
/// sent.
///
/// # Examples
///
/// ```
/// use proxyguard_client::ProxyAddress;
///
/// let addr: ProxyAddress = "127.0.0.1:1080".parse()?;
/// assert_eq!(addr.host(), "127.0.0.1");
/// assert_eq!(addr.port(), 1080);
/// assert_eq!(addr.to_proxy_url(), "socks5h://127.0.0.1:1080");
///
/// assert!("bad::address".parse::<ProxyAddress>().is_err());
/// # Ok::<(), proxyguard_client::ProxyAddressError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyAddress {
    host: String,
    port: u16,
}

impl ProxyAddress {
    /// Parses `host:port`.
    ///
    /// The address is read as the authority of a `socks5h://` URL, so the same
    /// parser that later builds the proxy validates it here. Credentials, paths,
    /// queries and fragments are refused.
    ///
    /// # Errors
    ///
    /// Returns a [`ProxyAddressError`] describing the first problem found.
    pub fn parse(address: &str) -> Result<Self, ProxyAddressError> {
        if address.is_empty() {
            return Err(ProxyAddressError::Empty);
        }
        // The URL parser silently strips these.
        if address.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(unexpected(address, "whitespace"));
        }

        let url = Url::parse(&format!("{SCHEME}://{address}")).map_err(|e| {
            let address = address.to_string();
            match e {
                ParseError::EmptyHost => ProxyAddressError::MissingHost(address),
                ParseError::InvalidPort => ProxyAddressError::InvalidPort { address, source: e },
                ParseError::InvalidIpv4Address
                | ParseError::InvalidIpv6Address
                | ParseError::InvalidDomainCharacter
                | ParseError::IdnaError => ProxyAddressError::InvalidHost { address, source: e },
                _ => ProxyAddressError::Malformed { address, source: e },
            }
        })?;

        if !url.username().is_empty() || url.password().is_some() {
            return Err(unexpected(address, "credentials"));
        }
        if !url.path().is_empty() {
            return Err(unexpected(address, "a path"));
        }
        if url.query().is_some() {
            return Err(unexpected(address, "a query"));
        }
        if url.fragment().is_some() {
            return Err(unexpected(address, "a fragment"));
        }

        let host = match url.host() {
            Some(Host::Ipv6(ip)) => ip.to_string(),
            Some(Host::Ipv4(ip)) => ip.to_string(),
            Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
            _ => return Err(ProxyAddressError::MissingHost(address.to_string())),
        };
        let port = url
            .port()
            .ok_or_else(|| ProxyAddressError::MissingPort(address.to_string()))?;

        Ok(Self { host, port })
    }

    /// Host name or IP literal, without brackets.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// TCP port of the relay.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Proxy URL handed to the HTTP stack.
    ///
    /// Uses `socks5h` so destination names are resolved by the relay and no DNS
    /// lookup for the target leaves this host directly.
    #[must_use]
    pub fn to_proxy_url(&self) -> String {
        format!("socks5h://{self}")
    }

    /// Builds an unauthenticated SOCKS5 proxy covering every scheme.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyAddressError::Dialer`] if the HTTP stack rejects the URL.
    pub fn to_proxy(&self) -> Result<Proxy, ProxyAddressError> {
        Proxy::all(self.to_proxy_url()).map_err(ProxyAddressError::Dialer)
    }
}

impl fmt::Display for ProxyAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

fn unexpected(address: &str, component: &'static str) -> ProxyAddressError {
    ProxyAddressError::UnexpectedComponent {
        address: address.to_string(),
        component,
    }
}

impl FromStr for ProxyAddress {
    type Err = ProxyAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
