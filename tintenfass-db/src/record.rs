use sqlx::FromRow;
use time::OffsetDateTime;
use tintenfass_common::model::{
    ModelValidationError,
    post::{Post, PostBody, PostTitle},
    user::{Email, User, UserCredentials, UserName},
};

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub struct CredentialsRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub struct PostRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub created_at: OffsetDateTime,
}

impl TryFrom<UserRecord> for User {
    type Error = ModelValidationError;

    fn try_from(value: UserRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: UserName::new(value.name)?,
            email: Email::new(value.email)?,
        })
    }
}

impl TryFrom<CredentialsRecord> for UserCredentials {
    type Error = ModelValidationError;

    fn try_from(value: CredentialsRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            user: User {
                id: value.id.into(),
                name: UserName::new(value.name)?,
                email: Email::new(value.email)?,
            },
            password_hash: value.password_hash,
        })
    }
}

impl TryFrom<PostRecord> for Post {
    type Error = ModelValidationError;

    fn try_from(value: PostRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            title: PostTitle::new(value.title)?,
            content: PostBody::new(value.content)?,
            author_id: value.author_id.into(),
            created_at: value.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{PostRecord, UserRecord};
    use time::macros::datetime;
    use tintenfass_common::model::{post::Post, user::User};

    #[test]
    fn user_record_converts() {
        let record = UserRecord {
            id: 3,
            name: "Ada".into(),
            email: "ada@example.com".into(),
        };

        let user = User::try_from(record).unwrap();
        assert_eq!(user.id.get(), 3);
        assert_eq!(user.email.get(), "ada@example.com");
    }

    #[test]
    fn post_record_converts() {
        let record = PostRecord {
            id: 9,
            title: "Title".into(),
            content: "Content".into(),
            author_id: 3,
            created_at: datetime!(2025-06-01 12:00 UTC),
        };

        let post = Post::try_from(record).unwrap();
        assert_eq!(post.id.get(), 9);
        assert_eq!(post.author_id.get(), 3);
    }

    #[test]
    fn record_with_empty_title_is_invalid() {
        let record = PostRecord {
            id: 9,
            title: String::new(),
            content: "Content".into(),
            author_id: 3,
            created_at: datetime!(2025-06-01 12:00 UTC),
        };

        assert!(Post::try_from(record).is_err());
    }
}
