//! Authentication claims for JWT access tokens.
//!
//! Token issuance lives outside this service; only validation happens here.
//! Claims carry the caller's identity and role ("admin" or "student").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// User's role ("admin" or "student").
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns true if the caller holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_new() {
        let user_id = Uuid::new_v4();
        let expires_at = Utc::now() + chrono::Duration::minutes(15);
        let claims = Claims::new(user_id, "admin", expires_at);

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp, expires_at.timestamp());
        assert!(claims.iat <= claims.exp);
    }

    #[test]
    fn test_is_admin() {
        let expires_at = Utc::now() + chrono::Duration::minutes(15);
        assert!(Claims::new(Uuid::new_v4(), "admin", expires_at).is_admin());
        assert!(!Claims::new(Uuid::new_v4(), "student", expires_at).is_admin());
        assert!(!Claims::new(Uuid::new_v4(), "Admin", expires_at).is_admin());
    }
}
