use crate::adapters::memory::{InMemoryBookStore, InMemoryMemberStore};
use crate::domain::model::{Book, Member};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The whole library persisted as one JSON document. This is the CLI's
/// storage format; the engine itself only sees the store ports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryState {
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl LibraryState {
    /// Missing file means a fresh, empty library.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no state file, starting empty");
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    pub fn into_stores(self) -> Result<(InMemoryBookStore, InMemoryMemberStore)> {
        let books = InMemoryBookStore::new();
        let members = InMemoryMemberStore::new();
        books.load(self.books)?;
        members.load(self.members)?;
        Ok((books, members))
    }

    pub fn from_stores(books: &InMemoryBookStore, members: &InMemoryMemberStore) -> Result<Self> {
        Ok(Self {
            books: books.snapshot()?,
            members: members.snapshot()?,
        })
    }
}
