mod articles;
mod auth;
mod comments;
mod follows;
mod likes;
mod tags;
mod users;

use axum::Router;

use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::routes())
        .nest("/user", users::routes())
        .nest("/article", articles::routes().merge(likes::routes()))
        .nest("/comments", comments::routes())
        .nest("/follows", follows::routes())
        .nest("/tag", tags::routes())
}
