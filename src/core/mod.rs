pub mod engine;

pub use crate::domain::model::{
    Book, Decision, DenyReason, Member, MemberSummary, QueuePosition, ReturnOutcome, SearchFilter,
};
pub use crate::domain::ports::{BookStore, MemberStore};
pub use crate::utils::error::Result;
