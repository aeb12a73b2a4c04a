//! # boopblur-store
//!
//! Local artifact storage for boopblur, backed by SQLite.
//!
//! [`Database`] is the synchronous handle: it wraps a `rusqlite::Connection`,
//! runs migrations on open and exposes typed helpers for artifacts and the
//! auxiliary settings/trace records. [`ArtifactStore`] is the async,
//! lazily-connected facade the rest of the application talks to.

pub mod artifacts;
pub mod database;
pub mod migrations;
pub mod records;
pub mod store;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use store::ArtifactStore;
