//! Builders wiring domain services over the configured adapters.
//!
//! With a database pool the Diesel repositories back the services; without
//! one both repositories share a fresh in-memory store.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use pagination::PageSize;
use postboard::domain::ports::{ImageStore, PasswordHasher, PostRepository, UserRepository};
use postboard::domain::{AccountService, CredentialService, ImageService, PostService};
use postboard::inbound::http::state::{HttpState, HttpStatePorts};
use postboard::outbound::memory::MemoryStore;
use postboard::outbound::persistence::{DieselPostRepository, DieselUserRepository};
use postboard::outbound::security::{BcryptPasswordHasher, JwtTokenCodec};
use postboard::outbound::storage::FsImageStore;
use tracing::{info, warn};

use super::ServerConfig;

/// Adapters shared by every service regardless of the repository backend.
struct SharedAdapters<H, I> {
    hasher: Arc<H>,
    images: Arc<I>,
    credentials: Arc<CredentialService>,
    clock: Arc<dyn Clock>,
    page_size: PageSize,
}

fn build_ports<U, P, H, I>(
    users: Arc<U>,
    posts: Arc<P>,
    shared: &SharedAdapters<H, I>,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    P: PostRepository + 'static,
    H: PasswordHasher + 'static,
    I: ImageStore + 'static,
{
    let accounts = Arc::new(AccountService::new(
        Arc::clone(&users),
        Arc::clone(&shared.hasher),
        Arc::clone(&shared.credentials),
    ));
    let post_service = Arc::new(
        PostService::new(
            posts,
            users,
            Arc::clone(&shared.images),
            Arc::clone(&shared.clock),
        )
        .with_page_size(shared.page_size),
    );
    let images = Arc::new(ImageService::new(
        Arc::clone(&shared.images),
        Arc::clone(&shared.clock),
    ));

    HttpStatePorts {
        accounts: accounts.clone(),
        accounts_query: accounts,
        posts: post_service.clone(),
        posts_query: post_service,
        images,
    }
}

/// Build the HTTP state for `config`.
///
/// # Errors
/// Returns [`std::io::Error`] when the image directory cannot be opened.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let credentials = Arc::new(
        CredentialService::new(
            Arc::new(JwtTokenCodec::new(config.token_secret.expose())),
            Arc::clone(&clock),
        )
        .with_ttl(config.token_ttl),
    );
    let images = FsImageStore::open(&config.image_dir, config.image_prefix.as_str())?;
    let shared = SharedAdapters {
        hasher: Arc::new(BcryptPasswordHasher::new(config.bcrypt_cost)),
        images: Arc::new(images),
        credentials: Arc::clone(&credentials),
        clock,
        page_size: config.page_size,
    };

    let ports = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            build_ports(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselPostRepository::new(pool.clone())),
                &shared,
            )
        }
        None => {
            warn!("no database configured; data is kept in memory only");
            let store = MemoryStore::new();
            build_ports(Arc::new(store.users()), Arc::new(store.posts()), &shared)
        }
    };

    Ok(HttpState::new(ports, credentials))
}
