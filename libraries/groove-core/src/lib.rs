//! Groove Core
//!
//! Platform-agnostic core types, traits, and error handling for Groove.
//!
//! This crate provides the foundational building blocks shared by the playback
//! core and its front-ends.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `CollectionPath`, `Track`, `CollectionEntry`
//! - **Core Traits**: `CollectionLookup`, the read-only view of the music collection
//! - **Error Handling**: Unified `GrooveError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use groove_core::{CollectionLookup, CollectionPath, MemoryCollection, Track};
//!
//! let mut collection = MemoryCollection::new();
//! let album: CollectionPath = "/Miles Davis/Kind of Blue".parse().unwrap();
//! collection.insert_tracks(
//!     album.clone(),
//!     vec![Track::new("so-what", "So What", "Miles Davis")],
//! );
//!
//! let track = collection.resolve_track(&"/Miles Davis/Kind of Blue/#0".parse().unwrap());
//! assert_eq!(track.map(|t| t.id.as_str()), Some("so-what"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod collection;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use collection::{CollectionRecord, MemoryCollection};
pub use error::{GrooveError, Result};
pub use traits::CollectionLookup;
pub use types::{CollectionEntry, CollectionPath, NodeKind, PathKey, Track};
