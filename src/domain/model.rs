use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A book in the catalogue. `loaned_to` and `due_date` are set together:
/// both present while the book is on loan, both absent otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub loaned_to: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Ordered wait-list; front of the list has hand-off priority.
    #[serde(default)]
    pub reservation_queue: Vec<String>,
}

impl Book {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            loaned_to: None,
            due_date: None,
            reservation_queue: Vec::new(),
        }
    }

    pub fn is_loaned(&self) -> bool {
        self.loaned_to.is_some()
    }

    pub fn queue_position(&self, member_id: &str) -> Option<usize> {
        self.reservation_queue.iter().position(|m| m == member_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Stable reason codes for denied operations. Callers switch on these for
/// user-facing messages; `code()` is the wire-stable spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenyReason {
    BookNotFound,
    MemberNotFound,
    AlreadyLoaned,
    BookUnavailable,
    BorrowLimit,
    QueueExists,
    AlreadyReserved,
    NotReserved,
    NotLoaned,
    InvalidExtension,
    InvalidRequest,
}

impl DenyReason {
    pub fn code(&self) -> &'static str {
        match self {
            DenyReason::BookNotFound => "BOOK_NOT_FOUND",
            DenyReason::MemberNotFound => "MEMBER_NOT_FOUND",
            DenyReason::AlreadyLoaned => "ALREADY_LOANED",
            DenyReason::BookUnavailable => "BOOK_UNAVAILABLE",
            DenyReason::BorrowLimit => "BORROW_LIMIT",
            DenyReason::QueueExists => "QUEUE_EXISTS",
            DenyReason::AlreadyReserved => "ALREADY_RESERVED",
            DenyReason::NotReserved => "NOT_RESERVED",
            DenyReason::NotLoaned => "NOT_LOANED",
            DenyReason::InvalidExtension => "INVALID_EXTENSION",
            DenyReason::InvalidRequest => "INVALID_REQUEST",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of a policy-checked operation. Business denials are values, not
/// errors; `LibraryError` is reserved for infrastructure failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Denied(DenyReason),
}

impl Decision {
    pub fn is_approved(&self) -> bool {
        matches!(self, Decision::Approved)
    }
}

/// Outcome of returning a book. `next_holder` is the member the book was
/// handed off to from its reservation queue, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReturnOutcome {
    Accepted { next_holder: Option<String> },
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueuePosition {
    pub book_id: String,
    /// Zero-based position in that book's reservation queue.
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSummary {
    pub loans: Vec<Book>,
    pub reservations: Vec<QueuePosition>,
}

/// Catalogue search filter; any field left `None` is a no-op.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub title_contains: Option<String>,
    /// `Some(true)` keeps only unloaned books, `Some(false)` only loaned ones.
    pub available_only: Option<bool>,
    pub loaned_to: Option<String>,
}
