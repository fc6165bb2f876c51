use serde::Deserialize;
use thiserror::Error;

use super::repo_types::User;

/// Request body for create and update. Any `id` in the body is ignored.
#[derive(Debug, Deserialize)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("field `{0}` is required")]
    Required(&'static str),
}

impl UserPayload {
    pub fn validate(&self) -> Result<(), PayloadError> {
        if self.name.is_empty() {
            return Err(PayloadError::Required("name"));
        }
        if self.email.is_empty() {
            return Err(PayloadError::Required("email"));
        }
        Ok(())
    }

    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_id_is_ignored() {
        let payload: UserPayload =
            serde_json::from_str(r#"{"id": 99, "name": "Eko", "email": "eko@example.com"}"#).unwrap();
        let user = payload.into_user(1);
        assert_eq!(user.id, 1);
        assert_eq!(user.name, "Eko");
    }

    #[test]
    fn missing_field_fails_to_bind() {
        let res = serde_json::from_str::<UserPayload>(r#"{"name": "Eko"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn empty_fields_are_rejected() {
        let p = UserPayload { name: String::new(), email: "a@b.c".into() };
        assert_eq!(p.validate(), Err(PayloadError::Required("name")));
        let p = UserPayload { name: "Eko".into(), email: String::new() };
        assert_eq!(p.validate(), Err(PayloadError::Required("email")));
        let p = UserPayload { name: "Eko".into(), email: "eko@example.com".into() };
        assert!(p.validate().is_ok());
    }
}
