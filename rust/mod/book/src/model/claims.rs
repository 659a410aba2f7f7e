use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A mutating action that requires a grant in the caller's token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    BookCreate,
    BookUpdate,
    BookDelete,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::BookCreate, Action::BookUpdate, Action::BookDelete];

    /// Permission name as carried in tokens.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::BookCreate => "book:create",
            Action::BookUpdate => "book:update",
            Action::BookDelete => "book:delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grants for every known action. Anything not granted is denied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Permissions {
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl Permissions {
    /// Every book action granted.
    pub fn all() -> Self {
        Self {
            create: true,
            update: true,
            delete: true,
        }
    }

    pub fn grants(&self, action: Action) -> bool {
        match action {
            Action::BookCreate => self.create,
            Action::BookUpdate => self.update,
            Action::BookDelete => self.delete,
        }
    }

    pub fn with(mut self, action: Action) -> Self {
        match action {
            Action::BookCreate => self.create = true,
            Action::BookUpdate => self.update = true,
            Action::BookDelete => self.delete = true,
        }
        self
    }
}

/// Caller permissions for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Instant after which the token no longer authorizes anything.
    pub expires_at: DateTime<Utc>,
    pub permissions: Permissions,
}

/// JWT payload as it travels on the wire.
///
/// Permission flags are top-level boolean claims named after the action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiration (unix timestamp).
    pub exp: i64,

    #[serde(rename = "book:create", default)]
    pub book_create: bool,

    #[serde(rename = "book:update", default)]
    pub book_update: bool,

    #[serde(rename = "book:delete", default)]
    pub book_delete: bool,
}

impl TokenClaims {
    pub fn new(expires_at: DateTime<Utc>, permissions: Permissions) -> Self {
        Self {
            exp: expires_at.timestamp(),
            book_create: permissions.create,
            book_update: permissions.update,
            book_delete: permissions.delete,
        }
    }

    /// Convert into request claims. `None` if `exp` is out of range.
    pub fn into_claims(self) -> Option<Claims> {
        let expires_at = Utc.timestamp_opt(self.exp, 0).single()?;
        Some(Claims {
            expires_at,
            permissions: Permissions {
                create: self.book_create,
                update: self.book_update,
                delete: self.book_delete,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names() {
        assert_eq!(Action::BookCreate.as_str(), "book:create");
        assert_eq!(Action::BookUpdate.to_string(), "book:update");
        assert_eq!(Action::BookDelete.as_str(), "book:delete");
    }

    #[test]
    fn default_permissions_grant_nothing() {
        let p = Permissions::default();
        for action in Action::ALL {
            assert!(!p.grants(action));
        }
        let p = p.with(Action::BookUpdate);
        assert!(p.grants(Action::BookUpdate));
        assert!(!p.grants(Action::BookCreate));
    }

    #[test]
    fn wire_claims_use_action_names() {
        let exp = Utc.timestamp_opt(1_900_000_000, 0).unwrap();
        let wire = TokenClaims::new(exp, Permissions::default().with(Action::BookCreate));
        let v = serde_json::to_value(&wire).unwrap();
        assert_eq!(v["book:create"], true);
        assert_eq!(v["book:delete"], false);
        assert_eq!(v["exp"], 1_900_000_000i64);
    }

    #[test]
    fn missing_and_unknown_permissions() {
        let wire: TokenClaims = serde_json::from_value(serde_json::json!({
            "exp": 1_900_000_000i64,
            "book:delete": true,
            "book:archive": true
        }))
        .unwrap();
        let claims = wire.into_claims().unwrap();
        assert!(claims.permissions.grants(Action::BookDelete));
        assert!(!claims.permissions.grants(Action::BookCreate));
        assert_eq!(claims.expires_at.timestamp(), 1_900_000_000);
    }
}
