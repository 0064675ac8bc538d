//! # proxyguard-client
//!
//! Builds HTTP clients for named providers and refuses to build one that would
//! connect directly when the provider demands a proxy.
//!
//! Two sources are merged per call:
//! - credentials, which may name a SOCKS5 relay under `socks5_proxy`
//! - provider metadata, which may set `reject_direct_connection` to `"true"` or `"1"`
//!
//! If metadata rejects direct connections and no relay is configured,
//! construction fails with [`FactoryError::PolicyViolation`]. Otherwise the
//! client gets a pooled transport (100 idle connections, 90 s idle timeout,
//! 10 s connection setup bound, 2 min request timeout), routed through the relay
//! when one is given.
//!
//! ## Example
//!
//! ```no_run
//! use proxyguard_client::build_client;
//! use proxyguard_common::{CredentialSettings, ProviderMetadata};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let creds = CredentialSettings::new().with("socks5_proxy", "127.0.0.1:1080");
//! let meta = ProviderMetadata::from(r#"{"reject_direct_connection":"true"}"#);
//!
//! let client = build_client("cloudflare", &creds, &meta)?;
//! let response = client.get("https://api.cloudflare.com/client/v4/").await?;
//! println!("{} via {}", response.status(), client.route());
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod client;
pub mod error;
pub mod events;
pub mod factory;

pub use address::ProxyAddress;
pub use client::{ProviderClient, Route};
pub use error::{FactoryError, ProxyAddressError};
pub use events::{EventSink, FactoryEvent, LogSink, NullSink};
pub use factory::ClientFactory;

use proxyguard_common::{CredentialSettings, ProviderIdentity, ProviderMetadata};

/// Builds a client with default transport options, logging through `log`.
///
/// Shorthand for `ClientFactory::new().build(...)`.
///
/// # Errors
///
/// See [`ClientFactory::build`].
pub fn build_client(
    identity: impl Into<ProviderIdentity>,
    credentials: &CredentialSettings,
    metadata: &ProviderMetadata,
) -> Result<ProviderClient, FactoryError> {
    ClientFactory::new().build(identity, credentials, metadata)
}
