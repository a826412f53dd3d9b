//! User profile record and display derivations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder shown when nothing usable exists on the profile.
const UNKNOWN_USER: &str = "Unknown User";

/// Profile of the authenticated user, as returned by the backend.
///
/// Every field except `id` and `email` is optional; the display derivations
/// below must never fail on missing fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserProfile {
    /// Human-readable name for headers/menus.
    ///
    /// Falls back through first+last name, first name alone, the email
    /// local-part, then username, then a generic placeholder.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            _ => {
                if let Some(local) = self.email.split('@').next().filter(|s| !s.is_empty()) {
                    return local.to_string();
                }
                self.username.clone().unwrap_or_else(|| UNKNOWN_USER.to_string())
            }
        }
    }

    /// One- or two-letter initials for avatar fallbacks, always uppercase.
    pub fn initials(&self) -> String {
        let first = self.first_name.as_deref().and_then(|s| s.chars().next());
        let last = self.last_name.as_deref().and_then(|s| s.chars().next());

        let raw = match (first, last) {
            (Some(f), Some(l)) => format!("{f}{l}"),
            (Some(f), None) => f.to_string(),
            _ => match self.email.chars().next() {
                Some(e) => e.to_string(),
                None => "U".to_string(),
            },
        };

        raw.to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(first: Option<&str>, last: Option<&str>, email: &str) -> UserProfile {
        UserProfile {
            id: Uuid::now_v7(),
            email: email.to_string(),
            username: None,
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            avatar: None,
        }
    }

    #[test]
    fn display_name_prefers_full_name() {
        let p = profile(Some("Ada"), Some("Lovelace"), "ada@example.com");
        assert_eq!(p.display_name(), "Ada Lovelace");
    }

    #[test]
    fn display_name_falls_back_to_email_local_part() {
        let p = profile(None, None, "ada@example.com");
        assert_eq!(p.display_name(), "ada");
    }

    #[test]
    fn display_name_uses_first_name_alone() {
        let p = profile(Some("Ada"), None, "ada@example.com");
        assert_eq!(p.display_name(), "Ada");
    }

    #[test]
    fn display_name_last_resort_placeholder() {
        let p = profile(None, None, "");
        assert_eq!(p.display_name(), "Unknown User");
    }

    #[test]
    fn initials_from_both_names() {
        let p = profile(Some("ada"), Some("lovelace"), "ada@example.com");
        assert_eq!(p.initials(), "AL");
    }

    #[test]
    fn initials_from_email_when_names_missing() {
        let p = profile(None, None, "grace@example.com");
        assert_eq!(p.initials(), "G");
    }

    #[test]
    fn initials_placeholder_when_everything_missing() {
        let p = profile(None, None, "");
        assert_eq!(p.initials(), "U");
    }

    #[test]
    fn serde_uses_camel_case_field_names() {
        let p = profile(Some("Ada"), None, "ada@example.com");
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("firstName").is_some());
        assert!(json.get("lastName").is_none());
    }
}
