use crate::domain::model::{Book, Member};
use crate::utils::error::Result;

/// Persistence port for books. Implementations are dumb storage: all
/// lending policy lives in the engine. The two query methods back the
/// engine's borrow-count check and the post-return reservation sweep.
pub trait BookStore: Send + Sync {
    fn find_by_id(&self, id: &str) -> Result<Option<Book>>;
    fn find_all(&self) -> Result<Vec<Book>>;
    fn save(&self, book: &Book) -> Result<()>;
    fn delete(&self, book: &Book) -> Result<()>;
    /// Number of books currently loaned to the given member.
    fn count_by_loaned_to(&self, member_id: &str) -> Result<usize>;
    /// Unloaned books whose reservation queue contains the given member.
    fn find_available_with_member_queued(&self, member_id: &str) -> Result<Vec<Book>>;
}

/// Persistence port for members.
pub trait MemberStore: Send + Sync {
    fn find_by_id(&self, id: &str) -> Result<Option<Member>>;
    fn exists_by_id(&self, id: &str) -> Result<bool>;
    fn find_all(&self) -> Result<Vec<Member>>;
    fn save(&self, member: &Member) -> Result<()>;
    fn delete(&self, member: &Member) -> Result<()>;
}
