//! Access gate: maps a bearer token to a role and checks privileges.
//!
//! Every request names the privilege it needs (`READ_OPERATION`,
//! `DELETE_API`, ...). The gate runs before the hierarchy manager; the manager
//! itself never looks at credentials.

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::debug;

use crate::model::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

/// An action on one kind of entity, rendered as `READ_OPERATION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Privilege {
    pub action: Action,
    pub kind: EntityKind,
}

impl Privilege {
    #[must_use]
    pub const fn new(action: Action, kind: EntityKind) -> Self {
        Self { action, kind }
    }

    #[must_use]
    pub const fn read(kind: EntityKind) -> Self {
        Self::new(Action::Read, kind)
    }

    #[must_use]
    pub const fn create(kind: EntityKind) -> Self {
        Self::new(Action::Create, kind)
    }

    #[must_use]
    pub const fn update(kind: EntityKind) -> Self {
        Self::new(Action::Update, kind)
    }

    #[must_use]
    pub const fn delete(kind: EntityKind) -> Self {
        Self::new(Action::Delete, kind)
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.action.as_str(), self.kind.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Every privilege.
    Admin,
    /// Read, create and update.
    Editor,
    /// Read only.
    Viewer,
}

impl Role {
    #[must_use]
    pub const fn grants(self, privilege: Privilege) -> bool {
        match self {
            Self::Admin => true,
            Self::Editor => !matches!(privilege.action, Action::Delete),
            Self::Viewer => matches!(privilege.action, Action::Read),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }
}

/// Caller identity once the gate accepted the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("missing or unknown bearer token")]
    Unauthenticated,
    #[error("missing privilege {0}")]
    Forbidden(Privilege),
}

/// Decides whether the caller behind `headers` holds `privilege`.
#[async_trait]
pub trait AccessGate: Send + Sync + fmt::Debug {
    /// # Errors
    /// `Unauthenticated` when no known credential is present, `Forbidden` when
    /// the caller lacks the privilege.
    async fn authorize(
        &self,
        headers: &HeaderMap,
        privilege: Privilege,
    ) -> Result<Principal, AccessError>;
}

/// Static bearer tokens, one set per role. Only SHA-256 digests are kept.
#[derive(Default)]
pub struct TokenGate {
    tokens: Vec<([u8; 32], Role)>,
}

impl fmt::Debug for TokenGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGate")
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

fn token_digest(token: &str) -> [u8; 32] {
    let mut digest = [0_u8; 32];
    digest.copy_from_slice(&Sha256::digest(token.as_bytes()));
    digest
}

impl TokenGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `token` for `role`. Blank tokens are ignored.
    #[must_use]
    pub fn with_token(mut self, role: Role, token: &SecretString) -> Self {
        let token = token.expose_secret().trim();
        if !token.is_empty() {
            self.tokens.push((token_digest(token), role));
        }
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn role_for(&self, token: &str) -> Option<Role> {
        let digest = token_digest(token);
        self.tokens
            .iter()
            .find(|(known, _)| *known == digest)
            .map(|(_, role)| *role)
    }
}

/// Extracts the token from `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl AccessGate for TokenGate {
    async fn authorize(
        &self,
        headers: &HeaderMap,
        privilege: Privilege,
    ) -> Result<Principal, AccessError> {
        let role = bearer_token(headers)
            .and_then(|token| self.role_for(token))
            .ok_or(AccessError::Unauthenticated)?;
        if !role.grants(privilege) {
            debug!(role = role.as_str(), %privilege, "privilege denied");
            return Err(AccessError::Forbidden(privilege));
        }
        Ok(Principal { role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn gate() -> TokenGate {
        TokenGate::new()
            .with_token(Role::Admin, &SecretString::from("admin-token"))
            .with_token(Role::Editor, &SecretString::from("editor-token"))
            .with_token(Role::Viewer, &SecretString::from("viewer-token"))
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(value) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    #[test]
    fn privilege_names_are_upper_snake_case() {
        assert_eq!(
            Privilege::read(EntityKind::Operation).to_string(),
            "READ_OPERATION"
        );
        assert_eq!(Privilege::delete(EntityKind::Api).to_string(), "DELETE_API");
        assert_eq!(
            Privilege::create(EntityKind::Environment).to_string(),
            "CREATE_ENVIRONMENT"
        );
    }

    #[test]
    fn roles_grant_expected_actions() {
        for kind in EntityKind::ALL {
            assert!(Role::Admin.grants(Privilege::delete(kind)));
            assert!(Role::Editor.grants(Privilege::update(kind)));
            assert!(!Role::Editor.grants(Privilege::delete(kind)));
            assert!(Role::Viewer.grants(Privilege::read(kind)));
            assert!(!Role::Viewer.grants(Privilege::create(kind)));
        }
    }

    #[tokio::test]
    async fn missing_or_unknown_token_is_unauthenticated() {
        let gate = gate();
        let privilege = Privilege::read(EntityKind::Api);
        assert_eq!(
            gate.authorize(&HeaderMap::new(), privilege).await,
            Err(AccessError::Unauthenticated)
        );
        assert_eq!(
            gate.authorize(&headers("Bearer nope"), privilege).await,
            Err(AccessError::Unauthenticated)
        );
        assert_eq!(
            gate.authorize(&headers("Basic admin-token"), privilege).await,
            Err(AccessError::Unauthenticated)
        );
    }

    #[tokio::test]
    async fn known_token_resolves_role() {
        let gate = gate();
        let principal = gate
            .authorize(&headers("bearer viewer-token"), Privilege::read(EntityKind::Plan))
            .await;
        assert_eq!(principal, Ok(Principal { role: Role::Viewer }));

        let denied = gate
            .authorize(
                &headers("Bearer viewer-token"),
                Privilege::delete(EntityKind::Plan),
            )
            .await;
        assert_eq!(
            denied,
            Err(AccessError::Forbidden(Privilege::delete(EntityKind::Plan)))
        );
    }

    #[test]
    fn blank_tokens_are_not_registered() {
        let gate = TokenGate::new().with_token(Role::Admin, &SecretString::from("  "));
        assert!(gate.is_empty());
    }

    #[test]
    fn debug_output_hides_tokens() {
        let rendered = format!("{:?}", gate());
        assert!(!rendered.contains("admin-token"));
    }
}
