pub mod auth;
pub mod post;
pub mod user;

use crate::model::{
    post::{InvalidPostBodyError, InvalidPostTitleError},
    user::{InvalidEmailError, InvalidUserNameError},
};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, marker::PhantomData};
use thiserror::Error;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum ModelValidationError {
    #[error(transparent)]
    UserName(#[from] InvalidUserNameError),
    #[error(transparent)]
    Email(#[from] InvalidEmailError),
    #[error(transparent)]
    PostTitle(#[from] InvalidPostTitleError),
    #[error(transparent)]
    PostBody(#[from] InvalidPostBodyError),
}

/// Store-generated row id, tagged with a marker type so user and post ids
/// cannot be mixed up.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Id<Marker>(i64, #[serde(skip)] PhantomData<Marker>);

impl<Marker> Id<Marker> {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id, PhantomData)
    }

    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> From<i64> for Id<Marker> {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl<Marker> From<Id<Marker>> for i64 {
    fn from(value: Id<Marker>) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::Id;
    use crate::model::{post::PostMarker, user::UserMarker};

    #[test]
    fn id_is_transparent_in_json() {
        let id = Id::<UserMarker>::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");

        let parsed: Id<PostMarker> = serde_json::from_str("7").unwrap();
        assert_eq!(parsed.get(), 7);
    }

    #[test]
    fn id_displays_as_plain_number() {
        assert_eq!(Id::<PostMarker>::new(1337).to_string(), "1337");
    }
}
