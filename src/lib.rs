//! linked-hash-table: an open-addressing hash table whose entries are also
//! threaded through a doubly linked order list.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: O(1) average keyed insert/lookup/remove together with a
//!   deterministic traversal order, either arrival order or the order of a
//!   caller-supplied comparator.
//! - Layers (leaves first):
//!   - `slots::SlotArray`: power-of-two array of cells
//!     (`Empty | Tombstone | Full(handle)`) probed by double hashing.
//!   - `order::OrderList`: arena of nodes (`slotmap::SlotMap`) linked
//!     head-to-tail by generational handles. Nodes own key and value and
//!     record the cell that points at them.
//!   - `resize`: grows/shrinks the slot array by load factor and purges
//!     tombstones, re-probing every entry without touching the links.
//!   - `cursor`: stateful walkers over the order list; `CursorMut` can
//!     remove the entry under it.
//!
//! Constraints
//! - Single-threaded, exclusively owned. No internal synchronization; wrap
//!   the table in a lock to share it.
//! - Every live entry is in exactly one cell and once in the order list,
//!   and its recorded cell is the one it occupies.
//! - Removal leaves a tombstone, so keys that probed past the removed one
//!   stay reachable. Tombstones are reclaimed by insertion and rebuilds.
//! - Inserting an existing key replaces its value in place.
//!
//! Probing
//! - `ProbeHasher::hash1` picks the home cell, `hash2` the step. Cell for
//!   round `r` is `(hash1 + r * hash2) mod capacity`. The step is forced odd
//!   so each sequence visits every cell once, and probing never runs longer
//!   than `capacity` rounds.
//!
//! Failure semantics
//! - Allocation of a slot array is fallible (`try_reserve`). At build time
//!   the failure is returned; during a resize it is reported and the table
//!   stays at its old capacity.
//! - A missing key is `None`, not an error.
//! - Destroying a non-empty table with `destroy` panics after reporting.
//!
//! Reporting
//! - The table never prints. Messages go to an injected [`Report`];
//!   [`TracingReport`] forwards them to `tracing`.
//!
//! Iteration and invalidation
//! - Cursors borrow the table, shared or exclusive, so the order list can
//!   only change under a cursor through that cursor.

mod config;
mod cursor;
mod error;
mod iter;
mod order;
mod probe;
mod report;
mod resize;
mod slots;
mod table;
mod table_proptest;

pub use config::{TableBuilder, TableConfig, DEFAULT_CAPACITY, MIN_CAPACITY};
pub use cursor::{Cursor, CursorMut, Direction};
pub use error::TableError;
pub use iter::{IntoIter, Iter, Keys, Values};
pub use probe::{DoubleHasher, FnProbe, ProbeHasher};
pub use report::{Report, TracingReport};
pub use table::{Comparator, LinkedHashTable};

/// Log levels accepted by [`Report`].
pub use tracing::Level;
