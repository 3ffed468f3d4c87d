//! Wayfarer Service
//!
//! The command boundary in front of the place store. UI surfaces send
//! JSON requests tagged by `action` and get `{ success, data?, error? }`
//! back; every request is executed by a single store actor, so concurrent
//! callers can never interleave a lookup with an insert.
//!
//! Provides:
//! - [`spawn_store_actor`] / [`StoreHandle`] - serialized access to a store
//! - [`serve`] - the line-delimited JSON transport used by the `wayfarer` binary
//! - [`ImportDocument`] / [`apply_import`] - validated import of export files
//! - [`WayfarerConfig`] - TOML configuration
//!
//! # Example
//!
//! ```
//! use wayfarer_service::spawn_store_actor;
//! use wayfarer_store::{MemoryBackend, PlaceStore};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = PlaceStore::open(MemoryBackend::new()).unwrap();
//! let (handle, _task) = spawn_store_actor(store, 64);
//!
//! let added = handle
//!     .send_json(r#"{"action":"addTodoPlace","place":{"name":"Cafe Luna","lat":10.0,"lng":20.0}}"#)
//!     .await;
//! assert_eq!(added.data, Some(serde_json::json!(true)));
//! # }
//! ```

#![warn(missing_docs)]

mod actor;
pub mod cli;
mod config;
mod error;
mod handlers;
mod import;
mod protocol;
mod server;

pub use actor::{spawn_store_actor, StoreHandle};
pub use cli::{Cli, Command};
pub use config::{ConfigError, LogLevel, ServiceConfig, StorageConfig, WayfarerConfig};
pub use error::{ImportError, ServiceError};
pub use handlers::{dispatch, handle_request, parse_request};
pub use import::{apply_import, ImportDocument, ImportReport};
pub use protocol::{Request, Response};
pub use server::{serve, serve_stdio};
