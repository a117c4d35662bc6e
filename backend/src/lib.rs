//! Postboard backend: a small authenticated post board.
//!
//! The crate follows a hexagonal layout. [`domain`] holds the rules and the
//! ports, [`inbound`] adapts HTTP requests onto the driving ports and
//! [`outbound`] implements the driven ports against PostgreSQL, memory,
//! the filesystem and the security primitives.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
