//! # proxyguard-common
//!
//! Data types shared by proxy-enforcing HTTP client construction.
//!
//! This crate has no I/O. It models the two configuration sources a client is
//! built from and the policy derived by merging them:
//! - [`CredentialSettings`]: caller-loaded credentials, possibly naming a SOCKS5 proxy
//! - [`ProviderMetadata`]: an opaque document that may forbid direct connections
//! - [`TransportPolicy`]: the merge of both, including the strict-mode check
//! - [`TransportOptions`]: pool and timeout defaults for the resulting transport
//!
//! ## Example
//!
//! ```
//! use proxyguard_common::{CredentialSettings, ProviderMetadata, TransportPolicy};
//!
//! let creds = CredentialSettings::new().with("socks5_proxy", "127.0.0.1:1080");
//! let meta = ProviderMetadata::from(r#"{"reject_direct_connection":"true"}"#);
//!
//! let policy = TransportPolicy::resolve(&creds, &meta);
//! assert!(policy.strict_mode());
//! assert_eq!(policy.proxy_address(), Some("127.0.0.1:1080"));
//! assert!(!policy.violates_strict_mode());
//! ```

/// Credential key/value settings.
pub mod credentials;
pub mod identity;
/// Provider metadata and the direct-connection flag.
pub mod metadata;
/// Pool and timeout options.
pub mod options;
pub mod policy;

pub use credentials::{CredentialSettings, SOCKS5_PROXY_KEY};
pub use identity::ProviderIdentity;
pub use metadata::{DirectConnectionFlag, ProviderMetadata, REJECT_DIRECT_CONNECTION_KEY};
pub use options::TransportOptions;
pub use policy::TransportPolicy;
