//! # rota-id
//!
//! Typed identifiers for the rotaplan rota engine.
//!
//! ## Design Principles
//!
//! - Identifiers are stable and system-generated; display names are
//!   user-controlled labels and never used as keys
//! - Every identifier has a canonical string form with strict parsing
//! - Identifiers round-trip through serialization (parse → format → parse)
//! - Each resource gets its own type so a person id can never be handed to
//!   an API expecting a shift id
//!
//! ## Format
//!
//! All identifiers use a prefixed form: `{prefix}_{ulid}`, e.g.
//!
//! - `psn_01JD8R2WQXKJNM8GPQY6VBKC3D`
//! - `shf_01JD8R3MXNKPQR9HSTZ7WCLD4E`
//! - `gen_01JD8R4NYPLTRS0JTUA8XDME5F`
//!
//! The ULID payload is time-ordered, which is what gives `GenerationId` its
//! monotonic-creation-order guarantee: sorting generation ids sorts them by
//! the moment they were minted.

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;

/// Re-export for consumers that need raw ULID operations.
pub use ulid::Ulid;
