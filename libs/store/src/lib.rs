//! SQLite-backed history store for the rota engine.
//!
//! Owns the authoritative state the engine is called with: the mutable
//! reference tables (people, shift definitions), the ordered append-only
//! period history, and the weekend duty track. The engine never sees this
//! crate; callers load state here, hand it to `rota-engine` functions, and
//! write the results back.
//!
//! Writes are serialized by SQLite's single-writer model. Each period is
//! independently addressable by its generation id and mutations target one
//! record at a time, so last-write-wins is acceptable for concurrent
//! operator edits.

mod store;

pub use store::{RotaStore, StoreError};
