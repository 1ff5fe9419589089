use axum::{
    Router,
    extract::{
        FromRef, Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use axum_extra::typed_header::TypedHeaderRejection;
use json::Json;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tintenfass_common::{
    model::{
        Id,
        auth::{AuthKeys, AuthTokenError},
        post::PostMarker,
        user::UserMarker,
    },
    password::PasswordHashError,
};
use tintenfass_db::client::{DbClient, DbError};
use tracing::error;

mod auth;
mod json;
mod routes;

pub type ServerRouter = Router<ServerState>;

#[derive(Clone, Debug, FromRef)]
pub struct ServerState {
    pub db_client: Arc<DbClient>,
    pub auth_keys: Arc<AuthKeys>,
}

pub fn routes() -> ServerRouter {
    routes::routes().fallback(fallback)
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Incoming JSON rejected: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("JSON response could not be serialized: {0}")]
    JsonResponse(#[from] serde_json::Error),
    #[error("Authorization header was missing or invalid: {0}")]
    InvalidAuthorizationHeader(TypedHeaderRejection),
    #[error("The provided token was rejected: {0}")]
    InvalidToken(AuthTokenError),
    #[error("Issuing a token failed: {0}")]
    TokenIssue(AuthTokenError),
    #[error("The password could not be hashed or verified: {0}")]
    PasswordHash(#[from] PasswordHashError),
    #[error("A user with this email already exists")]
    UserExists,
    #[error("The submitted credentials did not match")]
    InvalidCredentials,
    #[error("Post with id {0} was not found")]
    PostByIdNotFound(Id<PostMarker>),
    #[error("User {0} does not own post {1}")]
    NotPostOwner(Id<UserMarker>, Id<PostMarker>),
    #[error(transparent)]
    Database(DbError),
}

impl From<DbError> for ServerError {
    fn from(value: DbError) -> Self {
        match value {
            // The unique constraint is the backstop against registration
            // races, so it surfaces as the same conflict as the pre-check.
            DbError::DuplicateEmail => ServerError::UserExists,
            err => ServerError::Database(err),
        }
    }
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_) | ServerError::PostByIdNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ServerError::PathRejection(_)
            | ServerError::JsonRejection(_)
            | ServerError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ServerError::InvalidAuthorizationHeader(_) | ServerError::InvalidToken(_) => {
                StatusCode::UNAUTHORIZED
            }
            ServerError::NotPostOwner(_, _) => StatusCode::FORBIDDEN,
            ServerError::UserExists => StatusCode::CONFLICT,
            ServerError::JsonResponse(_)
            | ServerError::TokenIssue(_)
            | ServerError::PasswordHash(_)
            | ServerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internal detail stays in the server logs.
    pub fn message(&self) -> &'static str {
        match self {
            ServerError::UnknownRoute(_) => "Not found",
            ServerError::PathRejection(_) => "Invalid blog ID",
            ServerError::JsonRejection(_) => "Invalid request body",
            ServerError::InvalidAuthorizationHeader(_) | ServerError::InvalidToken(_) => {
                "Unauthorized"
            }
            ServerError::UserExists => "User already exists",
            ServerError::InvalidCredentials => "Invalid credentials",
            ServerError::PostByIdNotFound(_) => "Blog not found",
            ServerError::NotPostOwner(_, _) => "You can only modify your own blogs",
            ServerError::JsonResponse(_)
            | ServerError::TokenIssue(_)
            | ServerError::PasswordHash(_)
            | ServerError::Database(_) => "Server error",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
struct ErrorResponse {
    message: &'static str,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        error!(error = %self, %status, "Replying with error");

        let error_response = ErrorResponse {
            message: self.message(),
        };
        (status, Json(error_response)).into_response()
    }
}
