//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::CredentialService;
use crate::domain::ports::{AccountCommand, AccountQuery, ImageCommand, PostCommand, PostQuery};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub accounts_query: Arc<dyn AccountQuery>,
    pub posts: Arc<dyn PostCommand>,
    pub posts_query: Arc<dyn PostQuery>,
    pub images: Arc<dyn ImageCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub accounts_query: Arc<dyn AccountQuery>,
    pub posts: Arc<dyn PostCommand>,
    pub posts_query: Arc<dyn PostQuery>,
    pub images: Arc<dyn ImageCommand>,
    /// Verifies bearer tokens for [`super::session::SessionContext`].
    pub credentials: Arc<CredentialService>,
}

impl HttpState {
    /// Construct state from the driving ports and the token verifier.
    pub fn new(ports: HttpStatePorts, credentials: Arc<CredentialService>) -> Self {
        let HttpStatePorts {
            accounts,
            accounts_query,
            posts,
            posts_query,
            images,
        } = ports;
        Self {
            accounts,
            accounts_query,
            posts,
            posts_query,
            images,
            credentials,
        }
    }
}
