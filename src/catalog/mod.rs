//! Book catalog: typed records and the immutable in-memory store.
//!
//! The catalog is loaded once at startup and treated as read-only for the
//! lifetime of a serving instance. Downstream components receive shared
//! references and never mutate it.

pub mod book;
pub mod store;

pub use book::Book;
pub use store::Catalog;
