//! Wayfarer Storage Layer
//!
//! Implements the place store: two disjoint collections (todo, visited) plus
//! user settings, with identity resolution delegated to the domain matcher and
//! durability delegated to a [`PersistenceBackend`].
//!
//! # Architecture
//!
//! - [`PlaceStore`] owns the in-memory state and enforces the lifecycle rules
//! - [`SqliteBackend`] persists each aggregate as a JSON row in SQLite
//! - [`MemoryBackend`] keeps everything in process
//!
//! # Examples
//!
//! ```no_run
//! use wayfarer_store::{PlaceStore, SqliteBackend};
//!
//! let backend = SqliteBackend::open("wayfarer.db").unwrap();
//! let store = PlaceStore::open(backend).unwrap();
//! println!("{} places to visit", store.stats().todo_count);
//! ```
//!
//! [`PersistenceBackend`]: wayfarer_domain::traits::PersistenceBackend

#![warn(missing_docs)]

mod error;
mod memory;
mod sqlite;
mod store;

pub use error::StoreError;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;
pub use store::{CheckResult, PlaceStats, PlaceStore};
