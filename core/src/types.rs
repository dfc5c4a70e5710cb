//! Domain DTOs for the relationships endpoints.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch any drift between the two crates. Relationship
//! fields default when absent because the API omits empty values.

use serde::{Deserialize, Serialize};

/// The authenticated user's relationship to the target user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutgoingStatus {
    Follows,
    Requested,
    #[default]
    None,
}

/// The target user's relationship to the authenticated user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomingStatus {
    FollowedBy,
    RequestedBy,
    BlockedByYou,
    #[default]
    None,
}

/// Relationship state as observed by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub outgoing_status: OutgoingStatus,
    #[serde(default)]
    pub incoming_status: IncomingStatus,
    /// Undocumented by the API but present on relationship responses.
    #[serde(default)]
    pub target_user_is_private: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCounts {
    #[serde(default)]
    pub media: u64,
    #[serde(default)]
    pub follows: u64,
    #[serde(default)]
    pub followed_by: u64,
}

/// Another account, as returned in relationship listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub profile_picture: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub website: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<UserCounts>,
}

/// Opaque continuation cursor for listing endpoints.
///
/// The default value is the empty cursor: no further pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.next_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// The `meta` block every API envelope carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Relationship mutations accepted by `POST users/{id}/relationship`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Follow,
    Unfollow,
    Block,
    Unblock,
    Approve,
    Deny,
}

impl Action {
    /// Wire name sent as the `action` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Follow => "follow",
            Action::Unfollow => "unfollow",
            Action::Block => "block",
            Action::Unblock => "unblock",
            Action::Approve => "approve",
            Action::Deny => "deny",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationship_missing_fields_default_to_none() {
        let rel: Relationship = serde_json::from_str("{}").unwrap();
        assert_eq!(rel.outgoing_status, OutgoingStatus::None);
        assert_eq!(rel.incoming_status, IncomingStatus::None);
        assert!(!rel.target_user_is_private);
    }

    #[test]
    fn relationship_decodes_wire_names() {
        let rel: Relationship = serde_json::from_str(
            r#"{"outgoing_status":"requested","incoming_status":"blocked_by_you","target_user_is_private":true}"#,
        )
        .unwrap();
        assert_eq!(rel.outgoing_status, OutgoingStatus::Requested);
        assert_eq!(rel.incoming_status, IncomingStatus::BlockedByYou);
        assert!(rel.target_user_is_private);
    }

    #[test]
    fn relationship_rejects_unknown_status() {
        let result: Result<Relationship, _> =
            serde_json::from_str(r#"{"outgoing_status":"stalking"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn user_requires_id_and_username() {
        let user: User = serde_json::from_str(r#"{"id":"1","username":"alice"}"#).unwrap();
        assert_eq!(user.full_name, "");
        assert!(user.counts.is_none());

        let result: Result<User, _> = serde_json::from_str(r#"{"username":"alice"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn empty_pagination_has_no_next() {
        assert!(!Pagination::default().has_next());
        let empty_url = Pagination {
            next_url: Some(String::new()),
            next_cursor: None,
        };
        assert!(!empty_url.has_next());
    }

    #[test]
    fn action_wire_names_match_serde() {
        for action in [
            Action::Follow,
            Action::Unfollow,
            Action::Block,
            Action::Unblock,
            Action::Approve,
            Action::Deny,
        ] {
            let json = serde_json::to_value(action).unwrap();
            assert_eq!(json, action.as_str());
        }
    }
}
