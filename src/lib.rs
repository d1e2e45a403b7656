pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;

pub use adapters::memory::{InMemoryBookStore, InMemoryMemberStore};
pub use adapters::state_file::LibraryState;
pub use core::engine::{LibraryEngine, BORROW_LIMIT, LOAN_PERIOD_DAYS};
pub use domain::model::{
    Book, Decision, DenyReason, Member, MemberSummary, QueuePosition, ReturnOutcome, SearchFilter,
};
pub use domain::ports::{BookStore, MemberStore};
pub use utils::error::{LibraryError, Result};
