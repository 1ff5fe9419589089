use crate::model::{Id, user::UserMarker};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use thiserror::Error;
use time::OffsetDateTime;

pub const POST_TITLE_MAX_LEN: usize = 255;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct Post {
    pub id: Id<PostMarker>,
    pub title: PostTitle,
    pub content: PostBody,
    pub author_id: Id<UserMarker>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Client-supplied post fields, used for both creation and update.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct PostContent {
    pub title: PostTitle,
    pub content: PostBody,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize)]
#[serde(transparent)]
pub struct PostTitle(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The post title is invalid: {0}")]
pub struct InvalidPostTitleError(String);

impl PostTitle {
    pub fn new(title: String) -> Result<Self, InvalidPostTitleError> {
        if !title.is_empty() && title.chars().count() <= POST_TITLE_MAX_LEN {
            Ok(PostTitle(title))
        } else {
            Err(InvalidPostTitleError(title))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for PostTitle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        PostTitle::new(inner)
            .map_err(|err| Error::invalid_value(Unexpected::Str(&err.0), &"PostTitle"))
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize)]
#[serde(transparent)]
pub struct PostBody(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The post content may not be empty")]
pub struct InvalidPostBodyError;

impl PostBody {
    pub fn new(content: String) -> Result<Self, InvalidPostBodyError> {
        if content.is_empty() {
            Err(InvalidPostBodyError)
        } else {
            Ok(PostBody(content))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for PostBody {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        PostBody::new(inner)
            .map_err(|_| Error::invalid_value(Unexpected::Str(""), &"PostBody"))
    }
}

#[cfg(test)]
mod tests {
    use super::{Post, PostBody, PostContent, PostTitle};
    use time::macros::datetime;

    #[test]
    fn title_rejects_empty_and_overlong() {
        assert!(PostTitle::new(String::new()).is_err());
        assert!(PostTitle::new("x".repeat(256)).is_err());
        assert!(PostTitle::new("x".repeat(255)).is_ok());
    }

    #[test]
    fn body_rejects_empty() {
        assert!(PostBody::new(String::new()).is_err());
        assert_eq!(PostBody::new("hello".into()).unwrap().get(), "hello");
    }

    #[test]
    fn post_content_deserialization_rejects_empty_fields() {
        let ok: PostContent = serde_json::from_str(r#"{"title":"t","content":"c"}"#).unwrap();
        assert_eq!(ok.title.get(), "t");

        let empty_title: Result<PostContent, _> =
            serde_json::from_str(r#"{"title":"","content":"c"}"#);
        assert!(empty_title.is_err());

        let empty_content: Result<PostContent, _> =
            serde_json::from_str(r#"{"title":"t","content":""}"#);
        assert!(empty_content.is_err());
    }

    #[test]
    fn post_serializes_created_at_as_rfc3339() {
        let post = Post {
            id: 1.into(),
            title: PostTitle::new("t".into()).unwrap(),
            content: PostBody::new("c".into()).unwrap(),
            author_id: 2.into(),
            created_at: datetime!(2025-06-01 12:00 UTC),
        };

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["created_at"], "2025-06-01T12:00:00Z");
        assert_eq!(json["author_id"], 2);
    }
}
