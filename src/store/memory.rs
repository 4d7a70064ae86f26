use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;
use crate::models::Book;

use super::Store;

#[derive(Debug, Default)]
struct Shelf {
    books: Vec<Book>,
    writes: usize,
}

/// Store that keeps the book set in memory. Clones share the same shelf, so a
/// test can hand one handle to the catalog and inspect writes through another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    shelf: Rc<RefCell<Shelf>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set, as if it had been saved earlier.
    pub fn with_books(books: Vec<Book>) -> Self {
        let store = Self::default();
        store.shelf.borrow_mut().books = books;
        store
    }

    /// Number of `write` calls seen so far.
    pub fn writes(&self) -> usize {
        self.shelf.borrow().writes
    }

    /// Copy of the most recently written set.
    pub fn snapshot(&self) -> Vec<Book> {
        self.shelf.borrow().books.clone()
    }
}

impl Store for InMemoryStore {
    fn read(&mut self) -> Result<Vec<Book>> {
        Ok(self.shelf.borrow().books.clone())
    }

    fn write(&mut self, books: &[Book]) -> Result<()> {
        let mut shelf = self.shelf.borrow_mut();
        shelf.books = books.to_vec();
        shelf.writes += 1;
        Ok(())
    }
}
