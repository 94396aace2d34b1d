//! Reader and writer for JSON Topic Maps (JTM 1.0 and 1.1).
//!
//! This crate provides:
//! - [`Reader`], which imports a JTM topic map or fragment into any
//!   [`TopicMapStore`](jtm_store::TopicMapStore)
//! - [`Writer`], which exports any construct of a store back into JTM
//! - [`PrefixTable`], the CURIE resolver shared by both directions
//!
//! ## Quick Start
//!
//! ```rust
//! use jtm_codec::{Reader, Version, WriteOptions, Writer};
//! use jtm_store::MemoryTopicMap;
//! use serde_json::json;
//!
//! let mut map = MemoryTopicMap::default();
//! let document = json!({
//!     "item_type": "topic",
//!     "version": "1.1",
//!     "prefixes": { "ex": "http://example.org/" },
//!     "subject_identifiers": ["[ex:alice]"],
//!     "instance_of": ["si:[ex:Person]"]
//! });
//! let topic = Reader::new(&mut map).parse_document(&document, None)?;
//!
//! let writer = Writer::new(WriteOptions {
//!     version: Version::V1_0,
//!     ..Default::default()
//! });
//! let exported = writer.to_object(&map, topic, false);
//! assert_eq!(exported["subject_identifiers"][0], "http://example.org/alice");
//! # Ok::<(), jtm_codec::JtmError>(())
//! ```
//!
//! ## Key Types
//!
//! - [`Reader`] - Import JTM documents
//! - [`Writer`] / [`WriteOptions`] - Export constructs as JTM
//! - [`JtmError`] - The single `InvalidFormat` error kind
//!
#![deny(missing_docs)]

/// CURIE expansion and compaction.
pub mod curie;
/// Error type for JTM import.
pub mod error;
/// JTM item types.
pub mod item_type;
/// JTM reader implementation.
pub mod reader;
/// Tagged topic references.
pub mod reference;
/// JSON member helpers shared by the reader.
pub mod validation;
/// JTM format versions.
pub mod version;
/// JTM writer implementation.
pub mod writer;

pub use curie::{is_valid_prefix_name, PrefixTable};
pub use error::{JtmError, Result};
pub use item_type::ItemType;
pub use reader::Reader;
pub use reference::{IdentifierKind, TopicReference};
pub use version::Version;
pub use writer::{WriteOptions, Writer};
