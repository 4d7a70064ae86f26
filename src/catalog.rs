//! In-memory owner of the book set. Every mutation is followed by exactly one
//! full rewrite of the backing store; if that write fails the mutation is
//! undone so memory and disk never disagree.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::error::{CatalogError, PersistenceError, RecordError, Result};
use crate::models::{Book, BookStatus};
use crate::store::Store;

/// Exact-match filters for [`Catalog::search_books`]. `None` leaves that field
/// unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i64>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn year(mut self, year: i64) -> Self {
        self.year = Some(year);
        self
    }

    /// True when no filter is set. Such a query matches nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.year.is_none()
    }

    fn matches(&self, book: &Book) -> bool {
        self.title.as_ref().map_or(true, |title| &book.title == title)
            && self.author.as_ref().map_or(true, |author| &book.author == author)
            && self.year.map_or(true, |year| book.year == year)
    }
}

/// The catalog plus the store it synchronizes to.
#[derive(Debug)]
pub struct Catalog<S: Store> {
    books: Vec<Book>,
    /// Highest id handed out or loaded during this session.
    last_id: i64,
    store: S,
}

impl<S: Store> Catalog<S> {
    /// Load the full book set from `store`. Fails without producing a catalog
    /// when the stored content cannot be read or parsed, or when it holds
    /// non-positive or repeated ids.
    pub fn open(mut store: S) -> Result<Self> {
        let books = store.read()?;
        check_ids(&books)?;
        let last_id = books.iter().map(|book| book.id).max().unwrap_or(0);
        info!(count = books.len(), last_id, "catalog opened");
        Ok(Self {
            books,
            last_id,
            store,
        })
    }

    /// Append a new book with the next free id and `available` status. Title,
    /// author, and year are taken as given.
    pub fn add_book(
        &mut self,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i64,
    ) -> Result<&Book> {
        let id = self.next_id().inspect_err(|err| {
            warn!(%err, "add skipped");
        })?;
        self.books.push(Book {
            id,
            title: title.into(),
            author: author.into(),
            year,
            status: BookStatus::Available,
        });

        if let Err(err) = self.store.write(&self.books) {
            self.books.pop();
            return Err(err);
        }

        self.last_id = id;
        let book = &self.books[self.books.len() - 1];
        info!(id, title = %book.title, "book added");
        Ok(book)
    }

    pub fn find_by_id(&self, id: i64) -> Result<&Book> {
        let index = self.position(id)?;
        Ok(&self.books[index])
    }

    /// Remove the book with `id` and return it. Lookup failures leave the
    /// catalog and the store untouched.
    pub fn remove_book(&mut self, id: i64) -> Result<Book> {
        let index = self.position(id).inspect_err(|err| {
            warn!(id, %err, "remove skipped");
        })?;
        let book = self.books.remove(index);

        if let Err(err) = self.store.write(&self.books) {
            self.books.insert(index, book);
            return Err(err);
        }

        info!(id, title = %book.title, "book removed");
        Ok(book)
    }

    /// Books matching every supplied filter exactly, in catalog order. A query
    /// with no filters returns nothing rather than the whole catalog.
    pub fn search_books(&self, query: &SearchQuery) -> Vec<&Book> {
        if query.is_empty() {
            debug!("search without filters");
            return Vec::new();
        }

        let found: Vec<&Book> = self
            .books
            .iter()
            .filter(|book| query.matches(book))
            .collect();
        debug!(?query, hits = found.len(), "search finished");
        found
    }

    /// Overwrite the status of the book with `id`.
    pub fn edit_status(&mut self, id: i64, status: BookStatus) -> Result<&Book> {
        let index = self.position(id).inspect_err(|err| {
            warn!(id, %err, "status edit skipped");
        })?;
        let previous = std::mem::replace(&mut self.books[index].status, status);

        if let Err(err) = self.store.write(&self.books) {
            self.books[index].status = previous;
            return Err(err);
        }

        let book = &self.books[index];
        info!(id, from = %previous, to = %book.status, "status changed");
        Ok(book)
    }

    /// Every book in insertion order.
    pub fn list_all(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Id the next `add_book` call will assign.
    pub fn next_id(&self) -> Result<i64> {
        self.last_id
            .checked_add(1)
            .ok_or(CatalogError::IdExhausted(self.last_id))
    }

    fn position(&self, id: i64) -> Result<usize> {
        if id <= 0 {
            return Err(CatalogError::InvalidArgument(id));
        }
        let index = self
            .books
            .iter()
            .position(|book| book.id == id)
            .ok_or(CatalogError::NotFound(id))?;
        debug!(id, index, "book located");
        Ok(index)
    }
}

fn check_ids(books: &[Book]) -> Result<()> {
    let mut seen = HashSet::with_capacity(books.len());
    for book in books {
        let problem = if book.id <= 0 {
            RecordError::NonPositiveId(book.id)
        } else if !seen.insert(book.id) {
            RecordError::DuplicateId(book.id)
        } else {
            continue;
        };
        return Err(PersistenceError::Decode(Box::new(problem)).into());
    }
    Ok(())
}
