//! Ticket and user records as served by the board endpoint.
//!
//! Records are immutable once loaded. Nothing here validates that a
//! ticket's status, priority or owner is one of the known values; the
//! board degrades unknown values to fallback labels instead.

use serde::{Deserialize, Deserializer, Serialize};

/// Display names indexed by priority value.
pub const PRIORITY_NAMES: [&str; 5] = ["No priority", "Low", "Medium", "High", "Urgent"];

/// A unit of work on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub priority: i64,
    pub status: String,
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tag: Vec<String>,
}

/// A ticket owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub available: bool,
}

impl User {
    /// First character of the display name, used as the card avatar.
    pub fn initial(&self) -> Option<char> {
        self.name.trim().chars().next()
    }
}

/// Everything one fetch returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub tickets: Vec<Ticket>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl Dataset {
    pub fn find_user(&self, id: &str) -> Option<&User> {
        find_user(&self.users, id)
    }
}

pub fn find_user<'a>(users: &'a [User], id: &str) -> Option<&'a User> {
    users.iter().find(|user| user.id == id)
}

/// Display name for a priority value, if it is in range.
pub fn priority_name(priority: i64) -> Option<&'static str> {
    usize::try_from(priority)
        .ok()
        .and_then(|idx| PRIORITY_NAMES.get(idx))
        .copied()
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_decodes_camel_case_fields() {
        let raw = r#"{
            "id": "CAM-1",
            "title": "Update user profile page UI",
            "tag": ["Feature request"],
            "userId": "usr-1",
            "status": "Todo",
            "priority": 4
        }"#;
        let ticket: Ticket = serde_json::from_str(raw).expect("decode ticket");
        assert_eq!(ticket.user_id, "usr-1");
        assert_eq!(ticket.priority, 4);
        assert_eq!(ticket.tag, vec!["Feature request".to_string()]);
    }

    #[test]
    fn missing_or_null_tag_is_empty() {
        let missing = r#"{"id":"A","title":"t","userId":"u","status":"Todo","priority":1}"#;
        let null = r#"{"id":"A","title":"t","userId":"u","status":"Todo","priority":1,"tag":null}"#;
        let missing: Ticket = serde_json::from_str(missing).expect("missing tag");
        let null: Ticket = serde_json::from_str(null).expect("null tag");
        assert!(missing.tag.is_empty());
        assert!(null.tag.is_empty());
    }

    #[test]
    fn fractional_priority_is_rejected() {
        let raw = r#"{"id":"A","title":"t","userId":"u","status":"Todo","priority":1.5}"#;
        assert!(serde_json::from_str::<Ticket>(raw).is_err());
    }

    #[test]
    fn priority_names_cover_range_only() {
        assert_eq!(priority_name(0), Some("No priority"));
        assert_eq!(priority_name(4), Some("Urgent"));
        assert_eq!(priority_name(5), None);
        assert_eq!(priority_name(-1), None);
    }

    #[test]
    fn user_initial_skips_whitespace() {
        let user = User {
            id: "usr-1".to_string(),
            name: "  Anoop sharma".to_string(),
            available: false,
        };
        assert_eq!(user.initial(), Some('A'));
    }
}
