use crate::server::ServerRouter;
use axum::{Router, routing::get};

mod auth;
mod blogs;

pub fn routes() -> ServerRouter {
    Router::new()
        .route("/", get(greeting))
        .merge(auth::routes())
        .merge(blogs::routes())
}

async fn greeting() -> &'static str {
    "Welcome to the Blog Application API!"
}
