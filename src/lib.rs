//! chain-table: a separate-chaining hash table from byte-string keys to
//! borrowed values.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: an embeddable key/value container whose only moving parts are
//!   the bucket chains and the grow/shrink policy, each small enough to be
//!   checked on its own.
//! - Layers:
//!   - `hash`: the one-at-a-time mixer, also exposed as a `Hasher` so the
//!     table can take any `BuildHasher` (tests use a constant one to force
//!     every key into a single chain).
//!   - `chain`: doubly linked chains whose nodes live in a `SlotMap` arena
//!     and link by generational keys, giving O(1) splice-out from a handle
//!     without raw pointers.
//!   - `config`: per-table thresholds and the pure resize decision.
//!   - `table`: `ChainTable`, the public API (`get`/`put`/`remove`/`len`).
//!
//! Constraints
//! - Single-threaded; every mutation takes `&mut self`.
//! - Keys are arbitrary byte strings, copied into the table on insert.
//! - Values are `&'a T`: the table never owns, clones or drops them, and
//!   the borrow checker keeps them alive for as long as the table is.
//! - No iteration-order guarantee.
//!
//! Resize policy
//! - After every insert of a new key and every successful removal,
//!   `load = len / capacity` is compared against the configured band:
//!   above `max_load_factor` the slot array doubles; below
//!   `min_load_factor` it halves, never below `min_size`.
//! - Updating an existing key never resizes.
//! - A rebuild allocates the new slot array first and then relinks nodes
//!   using their stored hash; nodes are not reallocated and the policy is
//!   not re-entered while relinking.
//!
//! Failure model
//! - Construction rejects a zero capacity and invalid thresholds.
//! - Allocation of the slot array or of a key copy is fallible
//!   (`try_reserve_exact`) and reported as `TableError::OutOfMemory`,
//!   leaving the table unchanged.
//! - A rebuild that cannot allocate is skipped with a `tracing` warning;
//!   the table stays valid at its old capacity.
//!
//! Logging
//! - `tracing` events only; the library never installs a subscriber.

mod chain;
pub mod config;
pub mod error;
pub mod hash;
pub mod table;
mod table_proptest;

// Public surface
pub use config::TableConfig;
pub use error::TableError;
pub use hash::{one_at_a_time, BuildOneAtATime, OneAtATime};
pub use table::{ChainTable, Iter};
