use crate::domain::model::{Book, Member};
use crate::domain::ports::{BookStore, MemberStore};
use crate::utils::error::{LibraryError, Result};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

// BTreeMap keeps find_all iteration order deterministic, which the engine's
// reservation sweep depends on for reproducible behavior.

/// In-memory book store. Cloning shares the underlying map, so a CLI or test
/// can keep a handle for snapshots while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookStore {
    books: Arc<Mutex<BTreeMap<String, Book>>>,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>> {
    mutex.lock().map_err(|_| LibraryError::StorageError {
        message: format!("{what} store lock poisoned"),
    })
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, books: impl IntoIterator<Item = Book>) -> Result<()> {
        let mut guard = lock(&self.books, "book")?;
        for book in books {
            guard.insert(book.id.clone(), book);
        }
        Ok(())
    }

    pub fn snapshot(&self) -> Result<Vec<Book>> {
        Ok(lock(&self.books, "book")?.values().cloned().collect())
    }
}

impl BookStore for InMemoryBookStore {
    fn find_by_id(&self, id: &str) -> Result<Option<Book>> {
        Ok(lock(&self.books, "book")?.get(id).cloned())
    }

    fn find_all(&self) -> Result<Vec<Book>> {
        self.snapshot()
    }

    fn save(&self, book: &Book) -> Result<()> {
        lock(&self.books, "book")?.insert(book.id.clone(), book.clone());
        Ok(())
    }

    fn delete(&self, book: &Book) -> Result<()> {
        lock(&self.books, "book")?.remove(&book.id);
        Ok(())
    }

    fn count_by_loaned_to(&self, member_id: &str) -> Result<usize> {
        Ok(lock(&self.books, "book")?
            .values()
            .filter(|b| b.loaned_to.as_deref() == Some(member_id))
            .count())
    }

    fn find_available_with_member_queued(&self, member_id: &str) -> Result<Vec<Book>> {
        Ok(lock(&self.books, "book")?
            .values()
            .filter(|b| b.loaned_to.is_none() && b.queue_position(member_id).is_some())
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryMemberStore {
    members: Arc<Mutex<BTreeMap<String, Member>>>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, members: impl IntoIterator<Item = Member>) -> Result<()> {
        let mut guard = lock(&self.members, "member")?;
        for member in members {
            guard.insert(member.id.clone(), member);
        }
        Ok(())
    }

    pub fn snapshot(&self) -> Result<Vec<Member>> {
        Ok(lock(&self.members, "member")?.values().cloned().collect())
    }
}

impl MemberStore for InMemoryMemberStore {
    fn find_by_id(&self, id: &str) -> Result<Option<Member>> {
        Ok(lock(&self.members, "member")?.get(id).cloned())
    }

    fn exists_by_id(&self, id: &str) -> Result<bool> {
        Ok(lock(&self.members, "member")?.contains_key(id))
    }

    fn find_all(&self) -> Result<Vec<Member>> {
        self.snapshot()
    }

    fn save(&self, member: &Member) -> Result<()> {
        lock(&self.members, "member")?.insert(member.id.clone(), member.clone());
        Ok(())
    }

    fn delete(&self, member: &Member) -> Result<()> {
        lock(&self.members, "member")?.remove(&member.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_by_loaned_to_counts_only_that_member() {
        let store = InMemoryBookStore::new();
        let mut b1 = Book::new("b1", "One");
        b1.loaned_to = Some("m1".to_string());
        b1.due_date = Some(chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
        let mut b2 = Book::new("b2", "Two");
        b2.loaned_to = Some("m2".to_string());
        b2.due_date = Some(chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
        store.load([b1, b2, Book::new("b3", "Three")]).unwrap();

        assert_eq!(store.count_by_loaned_to("m1").unwrap(), 1);
        assert_eq!(store.count_by_loaned_to("nope").unwrap(), 0);
    }

    #[test]
    fn available_with_member_queued_excludes_loaned_books() {
        let store = InMemoryBookStore::new();
        let mut available = Book::new("free", "Free");
        available.reservation_queue = vec!["m1".to_string()];
        let mut loaned = Book::new("taken", "Taken");
        loaned.loaned_to = Some("other".to_string());
        loaned.due_date = Some(chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
        loaned.reservation_queue = vec!["m1".to_string()];
        store.load([available, loaned]).unwrap();

        let hits = store.find_available_with_member_queued("m1").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "free");
        assert!(store
            .find_available_with_member_queued("stranger")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn clones_share_state() {
        let store = InMemoryMemberStore::new();
        let handle = store.clone();
        store.save(&Member::new("m1", "Ada")).unwrap();
        assert!(handle.exists_by_id("m1").unwrap());
    }
}
