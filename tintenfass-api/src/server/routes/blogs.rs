use crate::server::{Result, ServerError, ServerRouter, auth::AuthenticatedUser, json::Json};
use axum::{
    extract::{Query, State},
    http::StatusCode,
};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tintenfass_common::model::{
    Id,
    post::{Post, PostContent, PostMarker},
};
use tintenfass_db::client::DbClient;
use tracing::debug;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 5;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(list_blogs)
        .typed_get(list_public_blogs)
        .typed_get(get_blog)
        .typed_post(create_blog)
        .typed_put(update_blog)
        .typed_delete(delete_blog)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/api/blogs", rejection(ServerError))]
struct BlogsPath();

#[derive(TypedPath, Deserialize)]
#[typed_path("/api/blogs/public", rejection(ServerError))]
struct PublicBlogsPath();

#[derive(TypedPath, Deserialize)]
#[typed_path("/api/blogs/{id}", rejection(ServerError))]
struct BlogPath {
    id: Id<PostMarker>,
}

async fn list_blogs(
    BlogsPath(): BlogsPath,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<Vec<Post>>> {
    let posts = db.fetch_posts().await?;

    Ok(Json(posts))
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
struct PageQuery {
    page: Option<String>,
    limit: Option<String>,
}

impl PageQuery {
    fn page(&self) -> i64 {
        parse_or(self.page.as_deref(), DEFAULT_PAGE)
    }

    fn limit(&self) -> i64 {
        parse_or(self.limit.as_deref(), DEFAULT_LIMIT)
    }
}

/// Absent, non-numeric and sub-1 values all fall back to the default.
fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|value| value.parse::<i64>().ok())
        .filter(|&value| value >= 1)
        .unwrap_or(default)
}

/// Saturates instead of overflowing: page and limit are client-controlled
/// and may each be as large as `i64::MAX`.
fn page_offset(page: i64, limit: i64) -> i64 {
    (page - 1).saturating_mul(limit)
}

fn total_pages(post_count: i64, limit: i64) -> i64 {
    if post_count == 0 {
        0
    } else {
        (post_count - 1) / limit + 1
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageResponse {
    blogs: Vec<Post>,
    total_pages: i64,
    current_page: i64,
}

async fn list_public_blogs(
    PublicBlogsPath(): PublicBlogsPath,
    State(db): State<Arc<DbClient>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse>> {
    let page = query.page();
    let limit = query.limit();
    let offset = page_offset(page, limit);

    debug!(page, limit, offset, "Fetching public blog page");

    let blogs = db.fetch_posts_page(limit, offset).await?;
    let post_count = db.count_posts().await?;

    Ok(Json(PageResponse {
        blogs,
        total_pages: total_pages(post_count, limit),
        current_page: page,
    }))
}

async fn get_blog(
    BlogPath { id }: BlogPath,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<Post>> {
    let post = db
        .fetch_post(id)
        .await?
        .ok_or(ServerError::PostByIdNotFound(id))?;

    Ok(Json(post))
}

async fn create_blog(
    BlogsPath(): BlogsPath,
    State(db): State<Arc<DbClient>>,
    user: AuthenticatedUser,
    Json(content): Json<PostContent>,
) -> Result<(StatusCode, Json<Post>)> {
    let post = db.create_post(&content, user.user_id()).await?;

    debug!(post_id = %post.id, author_id = %post.author_id, "Created blog post");

    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_blog(
    BlogPath { id }: BlogPath,
    State(db): State<Arc<DbClient>>,
    user: AuthenticatedUser,
    Json(content): Json<PostContent>,
) -> Result<Json<Post>> {
    let existing = db
        .fetch_post(id)
        .await?
        .ok_or(ServerError::PostByIdNotFound(id))?;

    if existing.author_id != user.user_id() {
        return Err(ServerError::NotPostOwner(user.user_id(), id));
    }

    let updated = db
        .update_post(id, &content)
        .await?
        .ok_or(ServerError::PostByIdNotFound(id))?;

    Ok(Json(updated))
}

#[derive(Serialize)]
struct DeleteResponse {
    message: &'static str,
}

async fn delete_blog(
    BlogPath { id }: BlogPath,
    State(db): State<Arc<DbClient>>,
    user: AuthenticatedUser,
) -> Result<Json<DeleteResponse>> {
    let existing = db
        .fetch_post(id)
        .await?
        .ok_or(ServerError::PostByIdNotFound(id))?;

    if existing.author_id != user.user_id() {
        return Err(ServerError::NotPostOwner(user.user_id(), id));
    }

    if !db.delete_post(id).await? {
        return Err(ServerError::PostByIdNotFound(id));
    }

    debug!(post_id = %id, "Deleted blog post");

    Ok(Json(DeleteResponse {
        message: "Blog deleted successfully",
    }))
}

#[cfg(test)]
mod tests {
    use super::{PageQuery, page_offset, parse_or, total_pages};

    #[test]
    fn page_params_default_when_absent_or_unusable() {
        let query = PageQuery {
            page: None,
            limit: None,
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), 5);

        assert_eq!(parse_or(Some("abc"), 1), 1);
        assert_eq!(parse_or(Some(""), 5), 5);
        assert_eq!(parse_or(Some("0"), 5), 5);
        assert_eq!(parse_or(Some("-3"), 1), 1);
    }

    #[test]
    fn page_params_pass_through_when_valid() {
        let query = PageQuery {
            page: Some("2".into()),
            limit: Some("10".into()),
        };
        assert_eq!(query.page(), 2);
        assert_eq!(query.limit(), 10);
    }

    #[test]
    fn offset_and_page_count_math() {
        // 12 seeded posts at 5 per page: pages 1 and 2 full, page 3 short.
        assert_eq!(total_pages(12, 5), 3);
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(1, 5), 1);

        assert_eq!(page_offset(1, 5), 0);
        assert_eq!(page_offset(2, 5), 5);
        assert_eq!(page_offset(3, 5), 10);
    }

    #[test]
    fn extreme_page_values_do_not_overflow() {
        // page and limit parse up to i64::MAX, so the offset must saturate
        // rather than panic or wrap negative.
        assert_eq!(page_offset(i64::MAX, i64::MAX), i64::MAX);
        assert_eq!(page_offset(i64::MAX, 1), i64::MAX - 1);
        assert_eq!(page_offset(1, i64::MAX), 0);

        assert_eq!(total_pages(1, i64::MAX), 1);
        assert_eq!(total_pages(i64::MAX, 1), i64::MAX);
        assert_eq!(total_pages(i64::MAX, i64::MAX), 1);
    }
}
