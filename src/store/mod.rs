//! Persistence boundary for the catalog. The [`Store`] trait reads and
//! overwrites the full book set at once; there is no incremental update path.
//! File-backed storage delegates the byte format to a [`Serializer`] so the
//! encoding can change without touching the catalog.

mod file;
mod json;
mod memory;

use crate::error::Result;
use crate::models::Book;

pub use file::FileStore;
pub use json::JsonSerializer;
pub use memory::InMemoryStore;

/// Durable home of the complete book set.
pub trait Store {
    /// Load every record in stored order. An absent store yields an empty
    /// vector; malformed content is a `PersistenceError`.
    fn read(&mut self) -> Result<Vec<Book>>;

    /// Replace the stored content with `books`. A failed write must never leave
    /// content that a later `read` accepts as a different, valid set.
    fn write(&mut self, books: &[Book]) -> Result<()>;
}

/// Structured data to bytes and back.
pub trait Serializer {
    fn encode(&self, books: &[Book]) -> Result<Vec<u8>>;

    fn decode(&self, bytes: &[u8]) -> Result<Vec<Book>>;
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn read(&mut self) -> Result<Vec<Book>> {
        (**self).read()
    }

    fn write(&mut self, books: &[Book]) -> Result<()> {
        (**self).write(books)
    }
}
