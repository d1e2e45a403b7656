use crate::domain::model::{
    Book, Decision, DenyReason, Member, MemberSummary, QueuePosition, ReturnOutcome, SearchFilter,
};
use crate::domain::ports::{BookStore, MemberStore};
use crate::utils::error::Result;
use chrono::{Duration, Local, NaiveDate};

pub const BORROW_LIMIT: usize = 5;
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Loan and reservation rules over a pair of dumb stores.
///
/// Every operation is one synchronous read-modify-write sequence with no
/// locking at this layer. Two concurrent calls touching the same book race
/// last-writer-wins; callers that need mutual exclusion must serialize
/// requests themselves (see DESIGN.md).
pub struct LibraryEngine<B: BookStore, M: MemberStore> {
    books: B,
    members: M,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn loan_due_date(from: NaiveDate) -> NaiveDate {
    from + Duration::days(LOAN_PERIOD_DAYS)
}

impl<B: BookStore, M: MemberStore> LibraryEngine<B, M> {
    pub fn new(books: B, members: M) -> Self {
        Self { books, members }
    }

    /// Fails closed: a missing member can never borrow.
    pub fn can_member_borrow(&self, member_id: &str) -> Result<bool> {
        if !self.members.exists_by_id(member_id)? {
            return Ok(false);
        }
        Ok(self.books.count_by_loaned_to(member_id)? < BORROW_LIMIT)
    }

    /// First member in the queue who exists and is under the borrow limit.
    fn first_eligible(&self, queue: &[String]) -> Result<Option<String>> {
        for queued in queue {
            if self.members.exists_by_id(queued)? && self.can_member_borrow(queued)? {
                return Ok(Some(queued.clone()));
            }
        }
        Ok(None)
    }

    /// Borrow a book. Queue-jump prevention: while an eligible member waits
    /// in the reservation queue, only the first such member may borrow.
    pub fn borrow_book(&self, book_id: &str, member_id: &str) -> Result<Decision> {
        let Some(mut book) = self.books.find_by_id(book_id)? else {
            return Ok(Decision::Denied(DenyReason::BookNotFound));
        };
        if !self.members.exists_by_id(member_id)? {
            return Ok(Decision::Denied(DenyReason::MemberNotFound));
        }

        // Book-specific denials come before the member's borrow limit.
        if book.loaned_to.as_deref() == Some(member_id) {
            return Ok(Decision::Denied(DenyReason::AlreadyLoaned));
        }
        if book.is_loaned() {
            return Ok(Decision::Denied(DenyReason::BookUnavailable));
        }
        if !self.can_member_borrow(member_id)? {
            return Ok(Decision::Denied(DenyReason::BorrowLimit));
        }

        if !book.reservation_queue.is_empty() {
            match self.first_eligible(&book.reservation_queue)? {
                Some(eligible) if eligible != member_id => {
                    return Ok(Decision::Denied(DenyReason::QueueExists));
                }
                Some(_) => {
                    // The requester is next in line; consume their reservation.
                    book.reservation_queue.retain(|m| m != member_id);
                }
                // No eligible member queued: anyone may borrow, queue untouched.
                None => {}
            }
        }

        book.loaned_to = Some(member_id.to_string());
        book.due_date = Some(loan_due_date(today()));
        self.books.save(&book)?;
        tracing::debug!(book = book_id, member = member_id, "book borrowed");
        Ok(Decision::Approved)
    }

    /// Return a book. Only the current borrower can return it. The book is
    /// then offered to the reservation queue, and finally the returning
    /// member may receive one of their own reserved books now that a loan
    /// slot is free.
    pub fn return_book(&self, book_id: &str, member_id: &str) -> Result<ReturnOutcome> {
        let Some(mut book) = self.books.find_by_id(book_id)? else {
            return Ok(ReturnOutcome::Rejected);
        };
        if book.loaned_to.is_none() || book.loaned_to.as_deref() != Some(member_id) {
            return Ok(ReturnOutcome::Rejected);
        }

        book.loaned_to = None;
        book.due_date = None;

        let next_holder = self.hand_off(&mut book)?;
        self.books.save(&book)?;
        tracing::debug!(book = book_id, member = member_id, next = ?next_holder, "book returned");

        self.sweep_reservations_for(member_id)?;

        Ok(ReturnOutcome::Accepted { next_holder })
    }

    /// Walk the queue from the front. Deleted members are dropped from the
    /// queue for good; members at their limit stay queued but are passed
    /// over. The first member who can take the book gets it.
    fn hand_off(&self, book: &mut Book) -> Result<Option<String>> {
        let mut idx = 0;
        while idx < book.reservation_queue.len() {
            let candidate = book.reservation_queue[idx].clone();

            if !self.members.exists_by_id(&candidate)? {
                book.reservation_queue.remove(idx);
                continue;
            }

            if self.can_member_borrow(&candidate)? {
                book.loaned_to = Some(candidate.clone());
                book.due_date = Some(loan_due_date(today()));
                book.reservation_queue.remove(idx);
                tracing::debug!(book = %book.id, member = %candidate, "hand-off to queued member");
                return Ok(Some(candidate));
            }

            idx += 1;
        }
        Ok(None)
    }

    /// After a return frees a loan slot, give the returning member at most
    /// one available book they are first eligible for in the queue.
    fn sweep_reservations_for(&self, member_id: &str) -> Result<()> {
        if !self.can_member_borrow(member_id)? {
            return Ok(());
        }

        let candidates = self.books.find_available_with_member_queued(member_id)?;
        for mut book in candidates {
            if self.first_eligible(&book.reservation_queue)?.as_deref() == Some(member_id) {
                book.loaned_to = Some(member_id.to_string());
                book.due_date = Some(loan_due_date(today()));
                book.reservation_queue.retain(|m| m != member_id);
                self.books.save(&book)?;
                tracing::debug!(book = %book.id, member = member_id, "reserved book assigned on return");
                break;
            }
        }
        Ok(())
    }

    /// Reserve a book. An available book goes straight out on loan when the
    /// member is eligible; otherwise the member joins the back of the queue.
    /// Members at their limit may still queue.
    pub fn reserve_book(&self, book_id: &str, member_id: &str) -> Result<Decision> {
        let Some(mut book) = self.books.find_by_id(book_id)? else {
            return Ok(Decision::Denied(DenyReason::BookNotFound));
        };
        if !self.members.exists_by_id(member_id)? {
            return Ok(Decision::Denied(DenyReason::MemberNotFound));
        }

        if book.queue_position(member_id).is_some() {
            return Ok(Decision::Denied(DenyReason::AlreadyReserved));
        }
        if book.loaned_to.as_deref() == Some(member_id) {
            return Ok(Decision::Denied(DenyReason::AlreadyLoaned));
        }

        if !book.is_loaned() && self.can_member_borrow(member_id)? {
            book.loaned_to = Some(member_id.to_string());
            book.due_date = Some(loan_due_date(today()));
            self.books.save(&book)?;
            tracing::debug!(book = book_id, member = member_id, "reservation filled immediately");
            return Ok(Decision::Approved);
        }

        book.reservation_queue.push(member_id.to_string());
        self.books.save(&book)?;
        tracing::debug!(book = book_id, member = member_id, "member queued");
        Ok(Decision::Approved)
    }

    pub fn cancel_reservation(&self, book_id: &str, member_id: &str) -> Result<Decision> {
        let Some(mut book) = self.books.find_by_id(book_id)? else {
            return Ok(Decision::Denied(DenyReason::BookNotFound));
        };
        if !self.members.exists_by_id(member_id)? {
            return Ok(Decision::Denied(DenyReason::MemberNotFound));
        }

        let before = book.reservation_queue.len();
        book.reservation_queue.retain(|m| m != member_id);
        if book.reservation_queue.len() == before {
            return Ok(Decision::Denied(DenyReason::NotReserved));
        }
        self.books.save(&book)?;
        Ok(Decision::Approved)
    }

    /// Adjust a loan's due date by `days`. Negative values shorten the loan;
    /// zero is rejected. A loaned book with no due date falls back to the
    /// standard period before the adjustment.
    pub fn extend_loan(&self, book_id: &str, days: i64) -> Result<Decision> {
        if days == 0 {
            return Ok(Decision::Denied(DenyReason::InvalidExtension));
        }
        let Some(mut book) = self.books.find_by_id(book_id)? else {
            return Ok(Decision::Denied(DenyReason::BookNotFound));
        };
        if !book.is_loaned() {
            return Ok(Decision::Denied(DenyReason::NotLoaned));
        }
        let base = book.due_date.unwrap_or_else(|| loan_due_date(today()));
        book.due_date = Some(base + Duration::days(days));
        self.books.save(&book)?;
        Ok(Decision::Approved)
    }

    /// In-memory filter over the whole catalogue; unset filters are no-ops.
    pub fn search_books(&self, filter: &SearchFilter) -> Result<Vec<Book>> {
        let needle = filter.title_contains.as_ref().map(|t| t.to_lowercase());
        let books = self
            .books
            .find_all()?
            .into_iter()
            .filter(|b| match &needle {
                Some(n) => b.title.to_lowercase().contains(n),
                None => true,
            })
            .filter(|b| match &filter.loaned_to {
                Some(m) => b.loaned_to.as_deref() == Some(m.as_str()),
                None => true,
            })
            .filter(|b| match filter.available_only {
                Some(true) => !b.is_loaned(),
                Some(false) => b.is_loaned(),
                None => true,
            })
            .collect();
        Ok(books)
    }

    /// Loaned books whose due date is strictly before `as_of`.
    pub fn overdue_books(&self, as_of: NaiveDate) -> Result<Vec<Book>> {
        let books = self
            .books
            .find_all()?
            .into_iter()
            .filter(|b| b.is_loaned())
            .filter(|b| b.due_date.map(|d| d < as_of).unwrap_or(false))
            .collect();
        Ok(books)
    }

    /// Current loans and queue positions for a member, or `None` when the
    /// member does not exist.
    pub fn member_summary(&self, member_id: &str) -> Result<Option<MemberSummary>> {
        if !self.members.exists_by_id(member_id)? {
            return Ok(None);
        }
        let mut loans = Vec::new();
        let mut reservations = Vec::new();
        for book in self.books.find_all()? {
            if let Some(position) = book.queue_position(member_id) {
                reservations.push(QueuePosition {
                    book_id: book.id.clone(),
                    position,
                });
            }
            if book.loaned_to.as_deref() == Some(member_id) {
                loans.push(book);
            }
        }
        Ok(Some(MemberSummary {
            loans,
            reservations,
        }))
    }

    // Plain CRUD below: field/existence validation, then straight delegation.

    pub fn create_book(&self, id: &str, title: &str) -> Result<Decision> {
        if id.trim().is_empty() || title.trim().is_empty() {
            return Ok(Decision::Denied(DenyReason::InvalidRequest));
        }
        self.books.save(&Book::new(id, title))?;
        Ok(Decision::Approved)
    }

    pub fn update_book(&self, id: &str, title: &str) -> Result<Decision> {
        let Some(mut book) = self.books.find_by_id(id)? else {
            return Ok(Decision::Denied(DenyReason::BookNotFound));
        };
        if title.trim().is_empty() {
            return Ok(Decision::Denied(DenyReason::InvalidRequest));
        }
        book.title = title.to_string();
        self.books.save(&book)?;
        Ok(Decision::Approved)
    }

    pub fn delete_book(&self, id: &str) -> Result<Decision> {
        let Some(book) = self.books.find_by_id(id)? else {
            return Ok(Decision::Denied(DenyReason::BookNotFound));
        };
        self.books.delete(&book)?;
        Ok(Decision::Approved)
    }

    pub fn create_member(&self, id: &str, name: &str) -> Result<Decision> {
        if id.trim().is_empty() || name.trim().is_empty() {
            return Ok(Decision::Denied(DenyReason::InvalidRequest));
        }
        self.members.save(&Member::new(id, name))?;
        Ok(Decision::Approved)
    }

    pub fn update_member(&self, id: &str, name: &str) -> Result<Decision> {
        let Some(mut member) = self.members.find_by_id(id)? else {
            return Ok(Decision::Denied(DenyReason::MemberNotFound));
        };
        if name.trim().is_empty() {
            return Ok(Decision::Denied(DenyReason::InvalidRequest));
        }
        member.name = name.to_string();
        self.members.save(&member)?;
        Ok(Decision::Approved)
    }

    pub fn delete_member(&self, id: &str) -> Result<Decision> {
        let Some(member) = self.members.find_by_id(id)? else {
            return Ok(Decision::Denied(DenyReason::MemberNotFound));
        };
        self.members.delete(&member)?;
        Ok(Decision::Approved)
    }

    pub fn find_book(&self, id: &str) -> Result<Option<Book>> {
        self.books.find_by_id(id)
    }

    pub fn all_books(&self) -> Result<Vec<Book>> {
        self.books.find_all()
    }

    pub fn all_members(&self) -> Result<Vec<Member>> {
        self.members.find_all()
    }
}
