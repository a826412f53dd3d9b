//! Wire DTOs for the `/auth/*` endpoints.
//!
//! The backend speaks camelCase JSON (`accessToken`, `refreshToken`, ...).

use serde::{Deserialize, Serialize};

use crewdeck_auth::UserProfile;

/// `POST /auth/login` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /auth/register` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// `POST /auth/refresh` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Shape shared by login and register responses.
///
/// `permissions`/`roles` are optional on the wire and default to empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// `POST /auth/refresh` response: a rotated token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Partial profile update (`PUT /auth/profile`); absent fields are left
/// untouched by the backend.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    /// Merge this update into an existing profile (the local-first mirror of
    /// what the backend applies).
    pub fn apply_to(&self, profile: &UserProfile) -> UserProfile {
        let mut next = profile.clone();
        if let Some(first) = &self.first_name {
            next.first_name = Some(first.clone());
        }
        if let Some(last) = &self.last_name {
            next.last_name = Some(last.clone());
        }
        if let Some(username) = &self.username {
            next.username = Some(username.clone());
        }
        if let Some(avatar) = &self.avatar {
            next.avatar = Some(avatar.clone());
        }
        next
    }
}

/// Error body the backend attaches to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn auth_response_defaults_missing_grant_arrays() {
        let json = serde_json::json!({
            "user": { "id": Uuid::now_v7(), "email": "ada@example.com" },
            "accessToken": "at",
            "refreshToken": "rt",
        });

        let resp: AuthResponse = serde_json::from_value(json).unwrap();
        assert!(resp.permissions.is_empty());
        assert!(resp.roles.is_empty());
        assert_eq!(resp.access_token, "at");
    }

    #[test]
    fn profile_update_merges_only_present_fields() {
        let profile = UserProfile {
            id: Uuid::now_v7(),
            email: "ada@example.com".to_string(),
            username: Some("ada".to_string()),
            first_name: Some("Ada".to_string()),
            last_name: None,
            avatar: None,
        };

        let update = ProfileUpdate {
            last_name: Some("Lovelace".to_string()),
            ..Default::default()
        };

        let merged = update.apply_to(&profile);
        assert_eq!(merged.first_name.as_deref(), Some("Ada"));
        assert_eq!(merged.last_name.as_deref(), Some("Lovelace"));
        assert_eq!(merged.username.as_deref(), Some("ada"));
    }

    #[test]
    fn requests_serialize_camel_case() {
        let req = RefreshRequest {
            refresh_token: "rt".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["refreshToken"], "rt");
    }
}
