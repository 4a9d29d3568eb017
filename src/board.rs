//! Grouping and ordering of tickets into board columns.
//!
//! Everything in this module is a pure function of its inputs: the
//! tickets, the users used for label lookup, and the two display
//! settings. Callers recompute the board whenever any of those change.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{self, Ticket, User};

pub const UNASSIGNED_TITLE: &str = "Unassigned";
pub const UNKNOWN_PRIORITY_TITLE: &str = "Unknown";

/// Field used to partition tickets into columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    #[default]
    Status,
    User,
    Priority,
}

impl Grouping {
    pub const ALL: [Grouping; 3] = [Grouping::Status, Grouping::User, Grouping::Priority];

    pub fn as_str(self) -> &'static str {
        match self {
            Grouping::Status => "status",
            Grouping::User => "user",
            Grouping::Priority => "priority",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grouping::Status => "Status",
            Grouping::User => "User",
            Grouping::Priority => "Priority",
        }
    }

    /// Parse a stored value, falling back to the default when unrecognised.
    ///
    /// An unknown value never becomes a grouping of its own: it does not
    /// produce a single column titled with the raw value.
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for Grouping {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "status" => Ok(Grouping::Status),
            "user" => Ok(Grouping::User),
            "priority" => Ok(Grouping::Priority),
            other => Err(Error::InvalidArgument(format!(
                "unknown grouping '{other}' (expected status|user|priority)"
            ))),
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order of tickets within a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sorting {
    /// Highest priority first.
    #[default]
    Priority,
    /// Title, ascending.
    Title,
}

impl Sorting {
    pub const ALL: [Sorting; 2] = [Sorting::Priority, Sorting::Title];

    pub fn as_str(self) -> &'static str {
        match self {
            Sorting::Priority => "priority",
            Sorting::Title => "title",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sorting::Priority => "Priority",
            Sorting::Title => "Title",
        }
    }

    /// Parse a stored value. Empty input gives the default; any other
    /// unrecognised value orders by title, as only `priority` selects the
    /// priority comparator.
    pub fn parse_or_default(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            return Sorting::default();
        }
        value.parse().unwrap_or(Sorting::Title)
    }
}

impl FromStr for Sorting {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "priority" => Ok(Sorting::Priority),
            "title" => Ok(Sorting::Title),
            other => Err(Error::InvalidArgument(format!(
                "unknown sorting '{other}' (expected priority|title)"
            ))),
        }
    }
}

impl fmt::Display for Sorting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tickets sharing one grouping-key value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub key: String,
    pub tickets: Vec<Ticket>,
}

/// A card as displayed in a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub priority: i64,
    pub status: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial: Option<char>,
    pub tags: Vec<String>,
}

impl Card {
    fn from_ticket(ticket: &Ticket, users: &[User]) -> Self {
        let user = model::find_user(users, &ticket.user_id);
        Self {
            id: ticket.id.clone(),
            title: ticket.title.clone(),
            priority: ticket.priority,
            status: ticket.status.clone(),
            user_id: ticket.user_id.clone(),
            assignee: user.map(|user| user.name.clone()),
            initial: user.and_then(User::initial),
            tags: ticket.tag.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub key: String,
    pub title: String,
    pub count: usize,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub grouping: Grouping,
    pub sorting: Sorting,
    pub columns: Vec<Column>,
}

impl Board {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn ticket_count(&self) -> usize {
        self.columns.iter().map(|column| column.count).sum()
    }
}

/// Grouping key of a ticket, stringified.
pub fn group_key(ticket: &Ticket, grouping: Grouping) -> String {
    match grouping {
        Grouping::Status => ticket.status.clone(),
        Grouping::User => ticket.user_id.clone(),
        Grouping::Priority => ticket.priority.to_string(),
    }
}

/// Partition tickets by `grouping`.
///
/// Groups come back ordered by key; tickets inside a group keep their
/// input order.
pub fn group_tickets(tickets: &[Ticket], grouping: Grouping) -> Vec<Group> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();
    for ticket in tickets {
        let key = group_key(ticket, grouping);
        let slot = match index.get(&key) {
            Some(slot) => *slot,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    tickets: Vec::new(),
                });
                groups.len() - 1
            }
        };
        groups[slot].tickets.push(ticket.clone());
    }
    groups.sort_by(|left, right| collate(&left.key, &right.key));
    groups
}

/// Stable in-place sort of one column.
pub fn sort_tickets(tickets: &mut [Ticket], sorting: Sorting) {
    match sorting {
        Sorting::Priority => tickets.sort_by(|left, right| right.priority.cmp(&left.priority)),
        Sorting::Title => tickets.sort_by(|left, right| collate(&left.title, &right.title)),
    }
}

/// Human-readable label for a group key.
pub fn group_title(key: &str, grouping: Grouping, users: &[User]) -> String {
    match grouping {
        Grouping::Status => key.to_string(),
        Grouping::User => model::find_user(users, key)
            .map(|user| user.name.clone())
            .unwrap_or_else(|| UNASSIGNED_TITLE.to_string()),
        Grouping::Priority => key
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(model::priority_name)
            .unwrap_or(UNKNOWN_PRIORITY_TITLE)
            .to_string(),
    }
}

/// Group, order and label `tickets` into board columns.
pub fn compute_board(
    tickets: &[Ticket],
    users: &[User],
    grouping: Grouping,
    sorting: Sorting,
) -> Board {
    let columns = group_tickets(tickets, grouping)
        .into_iter()
        .map(|mut group| {
            sort_tickets(&mut group.tickets, sorting);
            let cards: Vec<Card> = group
                .tickets
                .iter()
                .map(|ticket| Card::from_ticket(ticket, users))
                .collect();
            Column {
                title: group_title(&group.key, grouping, users),
                count: cards.len(),
                key: group.key,
                cards,
            }
        })
        .collect();

    Board {
        grouping,
        sorting,
        columns,
    }
}

/// Case-insensitive comparison with an exact tie breaker, so the order is
/// total and "apple" sorts before "Banana".
pub fn collate(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}
