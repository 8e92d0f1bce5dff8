//! Access to the upstream game catalog.

mod error;
/// Query gateway with empty-result fallbacks.
pub mod gateway;
/// Conversion of raw payloads into view models.
pub mod normalize;
/// Loosely typed upstream payloads.
pub mod raw;
/// HTTP transport abstraction.
pub mod transport;

#[cfg(test)]
pub(crate) mod stub;

pub use error::CatalogError;
pub use gateway::CatalogGateway;
pub use normalize::normalize;
pub use raw::RawGame;
pub use transport::{CatalogTransport, HttpTransport, Query};
