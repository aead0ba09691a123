//! Hierarchical collection paths
//!
//! A path is the key sequence from the collection root down to a group or a
//! track. Paths have a canonical string form used as a map key:
//!
//! ```text
//! []                               ""
//! ["Miles Davis"]                  "/Miles Davis"
//! ["Miles Davis", "Kind of Blue"]  "/Miles Davis/Kind of Blue"
//! [..., #3]                        "/Miles Davis/Kind of Blue/#3"
//! ["AC/DC"]                        "/AC\/DC"
//! ["#1 Hits"]                      "/\#1 Hits"
//! ```
//!
//! The canonical form is injective, and the key of a prefix is a string prefix
//! of the key of every longer path.

use crate::error::{GrooveError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One component of a collection path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathKey {
    /// Position inside a track list
    Index(u64),

    /// Named child of a group
    Name(String),
}

impl PathKey {
    /// Create a named key
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    fn write_canonical(&self, out: &mut String) {
        match self {
            Self::Index(index) => {
                out.push('#');
                out.push_str(&index.to_string());
            }
            Self::Name(name) => {
                for (i, c) in name.chars().enumerate() {
                    if c == '/' || c == '\\' || (i == 0 && c == '#') {
                        out.push('\\');
                    }
                    out.push(c);
                }
            }
        }
    }
}

impl From<&str> for PathKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for PathKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_canonical(&mut out);
        f.write_str(&out)
    }
}

/// Key sequence locating a node in the collection hierarchy
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionPath(Vec<PathKey>);

impl CollectionPath {
    /// Create a path from its keys
    pub fn new(keys: Vec<PathKey>) -> Self {
        Self(keys)
    }

    /// The empty path (collection root, or "the item root itself" when relative)
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn keys(&self) -> &[PathKey] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&PathKey> {
        self.0.last()
    }

    /// Canonical string key (see module docs)
    pub fn key(&self) -> String {
        let mut out = String::new();
        for key in &self.0 {
            out.push('/');
            key.write_canonical(&mut out);
        }
        out
    }

    /// True if every key of `self` matches the start of `other`
    pub fn is_prefix_of(&self, other: &CollectionPath) -> bool {
        self.len() <= other.len() && self.0.iter().zip(&other.0).all(|(a, b)| a == b)
    }

    /// Remainder of `self` after `prefix`, if `prefix` is a prefix of `self`
    pub fn strip_prefix(&self, prefix: &CollectionPath) -> Option<CollectionPath> {
        if prefix.is_prefix_of(self) {
            Some(Self(self.0[prefix.len()..].to_vec()))
        } else {
            None
        }
    }

    /// Concatenate two paths
    pub fn join(&self, suffix: &CollectionPath) -> CollectionPath {
        let mut keys = self.0.clone();
        keys.extend(suffix.0.iter().cloned());
        Self(keys)
    }

    /// Path of a direct child
    pub fn child(&self, key: PathKey) -> CollectionPath {
        let mut keys = self.0.clone();
        keys.push(key);
        Self(keys)
    }

    /// Path of the parent node, `None` for the empty path
    pub fn parent(&self) -> Option<CollectionPath> {
        self.split_last().map(|(parent, _)| parent)
    }

    /// Parent path and last key
    pub fn split_last(&self) -> Option<(CollectionPath, &PathKey)> {
        let (last, rest) = self.0.split_last()?;
        Some((Self(rest.to_vec()), last))
    }

    fn parse_component(input: &str, raw: &str, literal: bool) -> Result<PathKey> {
        if !literal {
            if let Some(digits) = raw.strip_prefix('#') {
                return digits
                    .parse::<u64>()
                    .map(PathKey::Index)
                    .map_err(|_| GrooveError::invalid_path(input, format!("bad index {raw:?}")));
            }
        }
        Ok(PathKey::Name(raw.to_string()))
    }
}

impl From<Vec<PathKey>> for CollectionPath {
    fn from(keys: Vec<PathKey>) -> Self {
        Self(keys)
    }
}

impl FromStr for CollectionPath {
    type Err = GrooveError;

    /// Parse a canonical key; the leading `/` may be omitted
    fn from_str(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Ok(Self::root());
        }

        let body = input.strip_prefix('/').unwrap_or(input);
        let mut keys = Vec::new();
        let mut current = String::new();
        // component started with an escaped '#', so it's a name
        let mut literal = false;
        let mut chars = body.chars();

        loop {
            match chars.next() {
                Some('\\') => {
                    let escaped = chars
                        .next()
                        .ok_or_else(|| GrooveError::invalid_path(input, "dangling escape"))?;
                    if escaped == '#' && current.is_empty() {
                        literal = true;
                    }
                    current.push(escaped);
                }
                Some('/') => {
                    keys.push(Self::parse_component(input, &current, literal)?);
                    current.clear();
                    literal = false;
                }
                Some(c) => current.push(c),
                None => {
                    keys.push(Self::parse_component(input, &current, literal)?);
                    break;
                }
            }
        }

        Ok(Self(keys))
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}
