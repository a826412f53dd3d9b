//! The authoritative session record.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crewdeck_auth::{Permission, Role, SessionError, UserProfile, predicates};

use crate::store::StoredCredentials;

/// Authentication status of the client session.
///
/// Failures are not a status of their own: every operation lands in a
/// well-defined terminal status and records the failure in
/// [`Session::error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No credential held.
    #[default]
    Anonymous,
    /// A login or register call is in flight.
    Authenticating,
    /// A valid (as far as we know) access token is held.
    Authenticated,
    /// A token rotation is in flight; the old access token is still held.
    Refreshing,
}

impl core::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SessionStatus::Anonymous => write!(f, "anonymous"),
            SessionStatus::Authenticating => write!(f, "authenticating"),
            SessionStatus::Authenticated => write!(f, "authenticated"),
            SessionStatus::Refreshing => write!(f, "refreshing"),
        }
    }
}

/// Single source of truth for everything the UI knows about authentication.
///
/// # Invariants
/// - `access_token` is present iff `status ∈ {Authenticated, Refreshing}`.
/// - `user` is present iff `access_token` is present.
/// - `permissions`/`roles` are empty whenever `user` is absent.
///
/// Owned exclusively by the session manager; everyone else sees immutable
/// snapshots through the watch channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub status: SessionStatus,
    pub user: Option<UserProfile>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub permissions: HashSet<Permission>,
    pub roles: HashSet<Role>,
    pub last_activity: Option<DateTime<Utc>>,
    pub error: Option<SessionError>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(
            self.status,
            SessionStatus::Authenticated | SessionStatus::Refreshing
        )
    }

    /// Whether the record satisfies the session invariants.
    pub fn invariants_hold(&self) -> bool {
        let token_matches_status = self.access_token.is_some() == self.is_authenticated();
        let user_matches_token = self.user.is_some() == self.access_token.is_some();
        let grants_match_user =
            self.user.is_some() || (self.permissions.is_empty() && self.roles.is_empty());

        token_matches_status && user_matches_token && grants_match_user
    }

    /// The durable mirror of this record's credential fields.
    pub fn credentials(&self) -> StoredCredentials {
        StoredCredentials {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            user: self.user.clone(),
        }
    }

    // ─── Authorization predicates (derived, safe at any status) ─────────────

    pub fn has_permission(&self, permission: &str) -> bool {
        predicates::has_permission(&self.permissions, permission)
    }

    pub fn has_any_permission<'a, I>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        predicates::has_any_permission(&self.permissions, required)
    }

    pub fn has_all_permissions<'a, I>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        predicates::has_all_permissions(&self.permissions, required)
    }

    pub fn has_role(&self, role: &str) -> bool {
        predicates::has_role(&self.roles, role)
    }

    pub fn has_any_role<'a, I>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        predicates::has_any_role(&self.roles, required)
    }

    pub fn is_admin(&self) -> bool {
        predicates::is_admin(&self.roles)
    }

    pub fn is_super_admin(&self) -> bool {
        predicates::is_super_admin(&self.roles)
    }

    /// Display name of the current user, or the generic placeholder.
    pub fn display_name(&self) -> String {
        match &self.user {
            Some(user) => user.display_name(),
            None => "Unknown User".to_string(),
        }
    }

    /// Avatar initials of the current user.
    pub fn initials(&self) -> String {
        match &self.user {
            Some(user) => user.initials(),
            None => "U".to_string(),
        }
    }
}
