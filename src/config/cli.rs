use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "lendbook")]
#[command(about = "Library loans and reservations over a JSON state file")]
pub struct Cli {
    /// Path to the JSON state file holding books and members.
    #[arg(long, default_value = "library.json")]
    pub state: String,

    /// Optional TOML settings file; explicit flags take precedence.
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Add a book to the catalogue.
    AddBook { id: String, title: String },
    /// Change a book's title.
    UpdateBook { id: String, title: String },
    /// Remove a book from the catalogue.
    DeleteBook { id: String },
    /// Register a member.
    AddMember { id: String, name: String },
    /// Change a member's name.
    UpdateMember { id: String, name: String },
    /// Remove a member.
    DeleteMember { id: String },
    /// Borrow a book for a member.
    Borrow { book: String, member: String },
    /// Return a book; the queue may hand it to the next member.
    Return { book: String, member: String },
    /// Reserve a book (loans immediately when possible).
    Reserve { book: String, member: String },
    /// Cancel a reservation.
    Cancel { book: String, member: String },
    /// Move a loan's due date by the given number of days.
    Extend { book: String, days: i64 },
    /// Search the catalogue.
    Search {
        #[arg(long)]
        title: Option<String>,
        /// true keeps only available books, false only loaned ones.
        #[arg(long)]
        available: Option<bool>,
        #[arg(long)]
        member: Option<String>,
    },
    /// List loans overdue as of a date (default: today).
    Overdue {
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Show a member's loans and queue positions.
    Summary { member: String },
    /// List all books.
    Books,
    /// List all members.
    Members,
}

impl Validate for Cli {
    fn validate(&self) -> Result<()> {
        validate_path("state", &self.state)?;
        if let Some(config) = &self.config {
            validate_path("config", config)?;
        }
        Ok(())
    }
}
