use crate::record::{CredentialsRecord, PostRecord, UserRecord};
use sqlx::{PgPool, query_as, query_scalar};
use thiserror::Error;
use tintenfass_common::model::{
    Id, ModelValidationError,
    post::{Post, PostContent, PostMarker},
    user::{Email, User, UserCredentials, UserMarker, UserName},
};

pub type Result<T, E = DbError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("A user with this email already exists")]
    DuplicateEmail,
    #[error("An object in the database was invalid: {0}")]
    Data(#[from] ModelValidationError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Debug)]
pub struct DbClient {
    pool: PgPool,
}

impl DbClient {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the schema if it does not exist yet. Called once by process
    /// bootstrap, before the server accepts requests.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            "
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                email VARCHAR(100) UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "
            CREATE TABLE IF NOT EXISTS posts (
                id BIGSERIAL PRIMARY KEY,
                title VARCHAR(255) NOT NULL,
                content TEXT NOT NULL,
                author_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn fetch_user_by_email(&self, email: &Email) -> Result<Option<User>> {
        let record = query_as::<_, UserRecord>(
            "
            SELECT id, name, email
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.get())
        .fetch_optional(&self.pool)
        .await?;

        let user = record.map(User::try_from).transpose()?;
        Ok(user)
    }

    pub async fn fetch_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>> {
        let record = query_as::<_, CredentialsRecord>(
            "
            SELECT id, name, email, password_hash
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.get())
        .fetch_optional(&self.pool)
        .await?;

        let credentials = record.map(UserCredentials::try_from).transpose()?;
        Ok(credentials)
    }

    /// Inserts a user. The unique constraint on email is the backstop
    /// against registration races; a violation surfaces as
    /// [`DbError::DuplicateEmail`].
    pub async fn create_user(
        &self,
        name: &UserName,
        email: &Email,
        password_hash: &str,
    ) -> Result<User> {
        let record = query_as::<_, UserRecord>(
            "
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email
            ",
        )
        .bind(name.get())
        .bind(email.get())
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::DuplicateEmail
            }
            err => DbError::Sqlx(err),
        })?;

        let user = User::try_from(record)?;
        Ok(user)
    }

    pub async fn fetch_posts(&self) -> Result<Vec<Post>> {
        let records = query_as::<_, PostRecord>(
            "
            SELECT id, title, content, author_id, created_at
            FROM posts
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let posts = records
            .into_iter()
            .map(Post::try_from)
            .collect::<Result<_, _>>()?;
        Ok(posts)
    }

    pub async fn fetch_posts_page(&self, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let records = query_as::<_, PostRecord>(
            "
            SELECT id, title, content, author_id, created_at
            FROM posts
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let posts = records
            .into_iter()
            .map(Post::try_from)
            .collect::<Result<_, _>>()?;
        Ok(posts)
    }

    pub async fn count_posts(&self) -> Result<i64> {
        let count = query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn fetch_post(&self, post_id: Id<PostMarker>) -> Result<Option<Post>> {
        let record = query_as::<_, PostRecord>(
            "
            SELECT id, title, content, author_id, created_at
            FROM posts
            WHERE id = $1
            ",
        )
        .bind(post_id.get())
        .fetch_optional(&self.pool)
        .await?;

        let post = record.map(Post::try_from).transpose()?;
        Ok(post)
    }

    pub async fn create_post(
        &self,
        content: &PostContent,
        author_id: Id<UserMarker>,
    ) -> Result<Post> {
        let record = query_as::<_, PostRecord>(
            "
            INSERT INTO posts (title, content, author_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, author_id, created_at
            ",
        )
        .bind(content.title.get())
        .bind(content.content.get())
        .bind(author_id.get())
        .fetch_one(&self.pool)
        .await?;

        let post = Post::try_from(record)?;
        Ok(post)
    }

    /// Overwrites title and content only. Id, owner and creation time are
    /// immutable after insert.
    pub async fn update_post(
        &self,
        post_id: Id<PostMarker>,
        content: &PostContent,
    ) -> Result<Option<Post>> {
        let record = query_as::<_, PostRecord>(
            "
            UPDATE posts
            SET title = $1, content = $2
            WHERE id = $3
            RETURNING id, title, content, author_id, created_at
            ",
        )
        .bind(content.title.get())
        .bind(content.content.get())
        .bind(post_id.get())
        .fetch_optional(&self.pool)
        .await?;

        let post = record.map(Post::try_from).transpose()?;
        Ok(post)
    }

    pub async fn delete_post(&self, post_id: Id<PostMarker>) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id.get())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
