//! Session token claims and the normalised identity derived from them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Claims carried by a session token, exactly as they appear on the wire.
///
/// `role` and `isAdmin` are both optional: records created before role
/// labels existed only carry the boolean flag.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Opaque user identifier
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(
        rename = "isAdmin",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_admin: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Issued-at (seconds since epoch)
    #[serde(default)]
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Moderator,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::User => "user",
        }
    }

    /// Parse a role label. Labels outside the closed set carry no privilege.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Role::User)
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "moderator" => Ok(Role::Moderator),
            "user" => Ok(Role::User),
            _ => Err(()),
        }
    }
}

/// The identity the gate hands to the rest of the request pipeline.
///
/// `is_admin` is computed once from the role label and the legacy flag;
/// nothing downstream looks at the raw claims again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub sub: String,
    pub role: Role,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub expires_at: i64,
}

impl Identity {
    pub fn has_admin_privilege(&self) -> bool {
        self.is_admin
    }
}

impl From<SessionClaims> for Identity {
    fn from(claims: SessionClaims) -> Self {
        let role = claims
            .role
            .as_deref()
            .map(Role::from_label)
            .unwrap_or(Role::User);
        // Either field may grant admin; a `false` flag never revokes an admin role.
        let is_admin = role == Role::Admin || claims.is_admin == Some(true);

        Self {
            sub: claims.sub,
            role,
            is_admin,
            email: claims.email,
            expires_at: claims.exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Option<&str>, is_admin: Option<bool>) -> SessionClaims {
        SessionClaims {
            sub: "user-1".to_string(),
            role: role.map(str::to_string),
            is_admin,
            email: None,
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn test_role_label_grants_admin() {
        assert!(Identity::from(claims(Some("admin"), None)).is_admin);
        assert!(Identity::from(claims(Some("ADMIN"), None)).is_admin);
    }

    #[test]
    fn test_legacy_flag_grants_admin_without_role() {
        let identity = Identity::from(claims(None, Some(true)));
        assert!(identity.is_admin);
        assert_eq!(identity.role, Role::User);
    }

    #[test]
    fn test_legacy_flag_overrides_user_role() {
        assert!(Identity::from(claims(Some("user"), Some(true))).is_admin);
    }

    #[test]
    fn test_admin_role_with_false_flag_stays_admin() {
        assert!(Identity::from(claims(Some("admin"), Some(false))).is_admin);
    }

    #[test]
    fn test_non_admin_combinations() {
        assert!(!Identity::from(claims(Some("user"), Some(false))).is_admin);
        assert!(!Identity::from(claims(Some("moderator"), None)).is_admin);
        assert!(!Identity::from(claims(None, None)).is_admin);
    }

    #[test]
    fn test_unknown_role_is_user() {
        let identity = Identity::from(claims(Some("superuser"), None));
        assert_eq!(identity.role, Role::User);
        assert!(!identity.is_admin);
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::json!({
            "sub": "abc",
            "role": "moderator",
            "isAdmin": false,
            "exp": 10
        });
        let parsed: SessionClaims = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.is_admin, Some(false));
        assert_eq!(parsed.role.as_deref(), Some("moderator"));
        assert_eq!(parsed.iat, 0);
    }
}
