use crate::server::{Result, ServerError, ServerRouter, json::Json};
use axum::{extract::State, http::StatusCode};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tintenfass_common::{
    model::{
        auth::AuthKeys,
        user::{Credentials, NewUser, User},
    },
    password,
};
use tintenfass_db::client::DbClient;
use tracing::debug;

pub fn routes() -> ServerRouter {
    ServerRouter::new().typed_post(register).typed_post(login)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/api/auth/register", rejection(ServerError))]
struct RegisterPath();

#[derive(Serialize)]
struct RegisterResponse {
    message: &'static str,
    user: User,
}

async fn register(
    RegisterPath(): RegisterPath,
    State(db): State<Arc<DbClient>>,
    Json(new_user): Json<NewUser>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    if db.fetch_user_by_email(&new_user.email).await?.is_some() {
        return Err(ServerError::UserExists);
    }

    let password_hash = password::hash(&new_user.password)?;

    let user = db
        .create_user(&new_user.name, &new_user.email, &password_hash)
        .await?;

    debug!(user_id = %user.id, "Registered new user");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered",
            user,
        }),
    ))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/api/auth/login", rejection(ServerError))]
struct LoginPath();

#[derive(Serialize)]
struct LoginResponse {
    token: String,
    user: User,
}

async fn login(
    LoginPath(): LoginPath,
    State(db): State<Arc<DbClient>>,
    State(auth_keys): State<Arc<AuthKeys>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<LoginResponse>> {
    // Unknown email and wrong password produce the identical external
    // response; only these log lines tell them apart.
    let Some(found) = db.fetch_credentials_by_email(&credentials.email).await? else {
        debug!(email = credentials.email.get(), "Login attempt for unknown email");
        return Err(ServerError::InvalidCredentials);
    };

    if !password::verify(&credentials.password, &found.password_hash)? {
        debug!(user_id = %found.user.id, "Login attempt with wrong password");
        return Err(ServerError::InvalidCredentials);
    }

    let token = auth_keys
        .issue(found.user.id)
        .map_err(ServerError::TokenIssue)?;

    debug!(user_id = %found.user.id, "Issued session token");

    Ok(Json(LoginResponse {
        token,
        user: found.user,
    }))
}
