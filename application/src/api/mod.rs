//! REST API definitions.

pub mod auth;
pub mod bicycle;
pub mod user;

use axum::{
    routing::{get, patch, post},
    Router,
};

/// Builds the [`Router`] of the REST API.
///
/// The [`Service`] and the cookie configuration are expected to be
/// provided as request extensions.
///
/// [`Service`]: crate::Service
pub fn router() -> Router {
    Router::new()
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/user", get(auth::current_user))
        .route("/api/register", post(user::register))
        .route("/api/admin/users", get(user::list))
        .route("/api/bicycles", get(bicycle::list).post(bicycle::create))
        .route("/api/bicycles/:id", get(bicycle::find))
        .route("/api/bicycles/:id/status", patch(bicycle::update_status))
}
