use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{
    fields::{require_email, require_text},
    Status, ValidationError,
};

const PASSWORD_MIN: usize = 8;

/// A consumer of the gateway's apis, looked up by email + credential.
///
/// Only an Argon2id PHC string of the password is kept and it is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Developer {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub status: Status,
    pub creation_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct DeveloperInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub status: Option<Status>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeveloperFields {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub status: Status,
}

/// Payload for `POST /v1/developers/authenticate`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct DeveloperCredentials {
    pub email: String,
    pub password: String,
}

/// Hashes `password` with Argon2id and a random salt into a PHC string.
///
/// # Errors
/// Returns `ValidationError` when the password cannot be hashed.
pub fn hash_password(password: &str) -> Result<String, ValidationError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ValidationError::new(format!("password could not be hashed: {err}")))
}

impl DeveloperInput {
    /// # Errors
    /// Returns `ValidationError` when the name is blank, the email is malformed, or
    /// the password is shorter than 8 characters.
    pub fn validate(self) -> Result<DeveloperFields, ValidationError> {
        let name = require_text(self.name, "name")?;
        let email = require_email(self.email, "email")?;
        let Some(password) = self.password else {
            return Err(ValidationError::missing("password"));
        };
        if password.chars().count() < PASSWORD_MIN {
            return Err(ValidationError::new(format!(
                "password must be at least {PASSWORD_MIN} characters"
            )));
        }
        Ok(DeveloperFields {
            name,
            email,
            password_hash: hash_password(&password)?,
            status: self.status.unwrap_or_default(),
        })
    }
}

impl Developer {
    #[must_use]
    pub fn new(id: String, fields: DeveloperFields, creation_date: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            email: fields.email,
            password_hash: fields.password_hash,
            status: fields.status,
            creation_date,
        }
    }

    /// `false` for a wrong password or an unreadable stored hash.
    #[must_use]
    pub fn verify_password(&self, password: &str) -> bool {
        PasswordHash::new(&self.password_hash).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
    }
}
