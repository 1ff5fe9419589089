use crate::model::Id;
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use std::fmt::{Debug, Formatter};
use thiserror::Error;

pub const USER_NAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 100;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct UserMarker;

/// Public view of a user. The password hash never appears here.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct User {
    pub id: Id<UserMarker>,
    pub name: UserName,
    pub email: Email,
}

/// Registration payload.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
pub struct NewUser {
    pub name: UserName,
    pub email: Email,
    pub password: Password,
}

/// Login payload.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
pub struct Credentials {
    pub email: Email,
    pub password: Password,
}

/// A user together with their stored password hash, for login verification.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize)]
#[serde(transparent)]
pub struct UserName(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The user name is invalid: {0}")]
pub struct InvalidUserNameError(String);

impl UserName {
    pub fn new(name: String) -> Result<Self, InvalidUserNameError> {
        if !name.is_empty() && name.chars().count() <= USER_NAME_MAX_LEN {
            Ok(UserName(name))
        } else {
            Err(InvalidUserNameError(name))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for UserName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        UserName::new(inner)
            .map_err(|err| Error::invalid_value(Unexpected::Str(&err.0), &"UserName"))
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The email is invalid: {0}")]
pub struct InvalidEmailError(String);

impl Email {
    pub fn new(email: String) -> Result<Self, InvalidEmailError> {
        if !email.is_empty() && email.chars().count() <= EMAIL_MAX_LEN {
            Ok(Email(email))
        } else {
            Err(InvalidEmailError(email))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Email {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        Email::new(inner).map_err(|err| Error::invalid_value(Unexpected::Str(&err.0), &"Email"))
    }
}

/// A raw password as submitted by a client. Never serialized, never logged.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Default, Hash, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    #[must_use]
    pub fn new(password: String) -> Self {
        Self(password)
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl Debug for Password {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Password").field(&"[redacted]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Email, Password, UserName};

    #[test]
    fn user_name_rejects_empty_and_overlong() {
        assert!(UserName::new(String::new()).is_err());
        assert!(UserName::new("a".repeat(101)).is_err());
        assert_eq!(UserName::new("Ada".into()).unwrap().get(), "Ada");
    }

    #[test]
    fn email_rejects_empty_and_overlong() {
        assert!(Email::new(String::new()).is_err());
        assert!(Email::new("a".repeat(101)).is_err());
        assert_eq!(
            Email::new("ada@example.com".into()).unwrap().get(),
            "ada@example.com"
        );
    }

    #[test]
    fn empty_name_is_rejected_at_deserialization() {
        let result: Result<UserName, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn password_debug_is_redacted() {
        let password = Password::new("hunter2".into());
        let debug = format!("{password:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[redacted]"));
    }
}
