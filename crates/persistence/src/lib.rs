// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer of the tracker import pipeline.
//!
//! This crate commits validated bundles. It provides:
//!
//! - The [`TrackerStore`] / [`TrackerSession`] collaborator traits the
//!   commit engine writes through
//! - [`InMemoryStore`], a transactional store that also acts as the
//!   preheat source and identity service of an import
//! - [`TrackerCommitService`], which persists a bundle in one transaction
//! - Reconciliation of attribute and data values, including file resource
//!   assignment and reserved values
//!
//! ## Transactions
//!
//! Every commit runs in one transaction. Writes are staged in the session
//! and checked against referential constraints when flushed: an
//! enrollment needs its tracked entity, an event its enrollment, and an
//! attribute value its tracked entity. The transaction is applied to the
//! committed data in one step, or not at all.
//!
//! ## Fixtures
//!
//! The store reads and writes [`StoreSnapshot`] JSON, which is what the CLI
//! and the tests use as fixtures.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod commit;
mod error;
mod memory;
mod reconcile;
mod snapshot;
mod store;

#[cfg(test)]
mod tests;

pub use commit::{CommitConfig, TrackerCommitService};
pub use error::{PersistenceError, StoreLockError};
pub use memory::{InMemoryStore, MemorySession};
pub use reconcile::{reconcile_attributes, reconcile_data_values};
pub use snapshot::StoreSnapshot;
pub use store::{StoredObject, TrackerSession, TrackerStore};
