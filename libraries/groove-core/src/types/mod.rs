//! Domain types for the music collection

mod collection;
mod path;
mod track;

pub use collection::{CollectionEntry, NodeKind};
pub use path::{CollectionPath, PathKey};
pub use track::Track;
