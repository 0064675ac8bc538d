//! Diagnostic events emitted during client construction.
//!
//! Events are observability only: the factory records them and moves on. A sink
//! can never veto or alter construction, and nothing a caller does depends on an
//! event having been recorded.

use std::fmt;

use log::{info, warn};
use proxyguard_common::ProviderIdentity;

use crate::address::ProxyAddress;

/// What the factory decided for one construction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FactoryEvent {
    /// The client will dial through a SOCKS5 relay.
    Proxied {
        /// Provider the client was built for.
        identity: ProviderIdentity,
        /// Relay address.
        address: ProxyAddress,
    },

    /// The client will dial destinations directly.
    Direct {
        /// Provider the client was built for.
        identity: ProviderIdentity,
    },

    /// Metadata was present but could not be read, so strict mode defaulted to off.
    MetadataUnreadable {
        /// Provider the client was built for.
        identity: ProviderIdentity,
    },
}

impl FactoryEvent {
    /// Provider the event concerns.
    #[must_use]
    pub const fn identity(&self) -> &ProviderIdentity {
        match self {
            Self::Proxied { identity, .. }
            | Self::Direct { identity }
            | Self::MetadataUnreadable { identity } => identity,
        }
    }
}

impl fmt::Display for FactoryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proxied { identity, address } => {
                write!(f, "using proxy {address} for {identity}")
            }
            Self::Direct { identity } => write!(f, "direct connection (no proxy) for {identity}"),
            Self::MetadataUnreadable { identity } => write!(
                f,
                "metadata for {identity} is unreadable; treating direct connections as allowed"
            ),
        }
    }
}

/// Receiver for [`FactoryEvent`]s.
///
/// Implemented for [`LogSink`], [`NullSink`] and any `Fn(&FactoryEvent)` closure.
pub trait EventSink: Send + Sync {
    /// Records one event. Must not panic.
    fn record(&self, event: &FactoryEvent);
}

impl<F> EventSink for F
where
    F: Fn(&FactoryEvent) + Send + Sync,
{
    fn record(&self, event: &FactoryEvent) {
        self(event);
    }
}

/// Writes events through the `log` facade.
///
/// Proxied routes log at `info`; direct routes and unreadable metadata log at
/// `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record(&self, event: &FactoryEvent) {
        match event {
            FactoryEvent::Proxied { .. } => info!("{event}"),
            FactoryEvent::Direct { .. } | FactoryEvent::MetadataUnreadable { .. } => {
                warn!("{event}");
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: &FactoryEvent) {}
}
