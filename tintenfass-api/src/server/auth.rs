use crate::server::ServerError;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use std::sync::Arc;
use tintenfass_common::model::{Id, auth::AuthKeys, user::UserMarker};

type AuthorizationHeader = TypedHeader<Authorization<Bearer>>;

/// The identity decoded from a verified bearer token. Handlers take this
/// as an extractor argument; requests without a valid token never reach
/// them.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct AuthenticatedUser {
    id: Id<UserMarker>,
}

impl AuthenticatedUser {
    #[must_use]
    pub fn user_id(self) -> Id<UserMarker> {
        self.id
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthKeys>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = AuthorizationHeader::from_request_parts(parts, state)
            .await
            .map_err(ServerError::InvalidAuthorizationHeader)?;

        let claims = Arc::<AuthKeys>::from_ref(state)
            .verify(header.token())
            .map_err(ServerError::InvalidToken)?;

        Ok(Self { id: claims.sub })
    }
}
