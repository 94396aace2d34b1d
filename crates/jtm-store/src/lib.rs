//! Topic Maps store contract and in-memory reference store.
//!
//! This crate provides:
//! - [`TopicMapStore`], the operations a JTM reader/writer issues against a
//!   topic map (factories, identity lookups, mutators, merge, sanitize and
//!   read accessors)
//! - Copyable construct handles ([`TopicId`], [`NameId`], ...) and the closed
//!   [`Construct`] enum over all construct kinds
//! - [`MemoryTopicMap`], an arena-backed reference store whose topic identity is
//!   a union-find over topic records
//!
//! Core invariants:
//! - A topic is identified by the union of its subject identifiers, subject
//!   locators and item identifiers; two topics sharing one are merged
//! - Item identifiers are unique across all constructs of a map
//! - A topic reifies at most one construct
//!
#![deny(missing_docs)]

/// Error types for store operations.
pub mod error;
/// Construct handles.
pub mod handle;
/// Locator newtype.
pub mod locator;
/// In-memory reference store.
pub mod memory;
/// Published subject identifiers used by the store and the codec.
pub mod psi;
/// The store contract.
pub mod traits;

pub use error::StoreError;
pub use handle::{
    AssociationId, Construct, ConstructKind, NameId, OccurrenceId, RoleId, TopicId, VariantId,
};
pub use locator::Locator;
pub use memory::MemoryTopicMap;
pub use traits::TopicMapStore;
