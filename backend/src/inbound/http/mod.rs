//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod images;
pub mod posts;
pub mod schemas;
pub mod session;
pub mod state;
pub mod status;
#[cfg(test)]
pub mod test_utils;
pub mod users;
mod validation;

use actix_web::{Scope, web};

pub use error::ApiResult;

/// Prefix under which every API route is mounted.
pub const API_PREFIX: &str = "/api/v1";

/// Scope carrying every API handler under [`API_PREFIX`].
///
/// Handlers expect `web::Data<HttpState>` to be registered on the app.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use postboard::inbound::http::api_scope;
///
/// let app = App::new().service(api_scope());
/// ```
pub fn api_scope() -> Scope {
    web::scope(API_PREFIX)
        .service(users::register)
        .service(users::login)
        .service(posts::list_posts)
        .service(posts::create_post)
        .service(posts::get_post)
        .service(posts::update_post)
        .service(posts::delete_post)
        .service(status::get_status)
        .service(status::update_status)
        .service(images::store_image)
}
