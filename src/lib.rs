//! Core library surface for the library catalog manager.
//!
//! The catalog and its store are plain types that any front end can drive; the
//! bundled terminal UI in [`ui`] is one such front end.
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

/// The catalog core and its search filter.
pub use catalog::{Catalog, SearchQuery};

pub use error::{CatalogError, PersistenceError, Result};

/// Domain types that other layers manipulate.
pub use models::{Book, BookStatus};

/// Persistence boundary and the bundled implementations.
pub use store::{FileStore, InMemoryStore, JsonSerializer, Serializer, Store};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
