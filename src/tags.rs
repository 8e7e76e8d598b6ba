use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::context::{self, Scope};
use crate::error::Error;

/// Maximum length of a tag key or tag value, in bytes.
pub const MAX_LENGTH: usize = 255;

fn validate(what: &str, s: &str) -> Result<(), Error> {
    if s.is_empty() {
        return Err(Error::invalid_argument(format!("{what} must not be empty")));
    }
    if s.len() > MAX_LENGTH {
        return Err(Error::invalid_argument(format!(
            "{what} must be at most {MAX_LENGTH} bytes, got {}",
            s.len()
        )));
    }
    if !s.bytes().all(|b| (0x20..=0x7e).contains(&b)) {
        return Err(Error::invalid_argument(format!(
            "{what} must contain only printable ASCII characters"
        )));
    }
    Ok(())
}

/// Validated name of a tag.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TagKey(String);

impl TagKey {
    /// Validates and wraps a key: non-empty, printable ASCII, at most
    /// [`MAX_LENGTH`] bytes.
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        validate("tag key", &name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated value of a tag. Same character and length rules as [`TagKey`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TagValue(String);

impl TagValue {
    pub fn new(value: impl Into<String>) -> Result<Self, Error> {
        let value = value.into();
        validate("tag value", &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How far a tag propagates once attached to the ambient context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagTtl {
    /// The tag stays within the process that created it.
    NoPropagation,
    /// The tag propagates without restriction.
    #[default]
    UnlimitedPropagation,
}

/// Per-tag metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TagMetadata {
    pub ttl: TagTtl,
}

impl TagMetadata {
    pub const NO_PROPAGATION: Self = Self {
        ttl: TagTtl::NoPropagation,
    };
    pub const UNLIMITED_PROPAGATION: Self = Self {
        ttl: TagTtl::UnlimitedPropagation,
    };
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
struct Entry {
    value: TagValue,
    metadata: TagMetadata,
}

/// Immutable, structurally shared mapping from [`TagKey`] to
/// ([`TagValue`], [`TagMetadata`]).
///
/// Cloning a `TagMap` is cheap; mutation goes through [`TagMapBuilder`], which
/// copies the entries once and produces a fresh map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TagMap {
    entries: Arc<BTreeMap<TagKey, Entry>>,
}

impl TagMap {
    /// The empty tag map.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &TagKey) -> Option<&TagValue> {
        self.entries.get(key).map(|e| &e.value)
    }

    pub fn get_metadata(&self, key: &TagKey) -> Option<&TagMetadata> {
        self.entries.get(key).map(|e| &e.metadata)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TagKey, &TagValue, &TagMetadata)> {
        self.entries.iter().map(|(k, e)| (k, &e.value, &e.metadata))
    }

    /// Starts a recording builder seeded with no entries.
    pub fn builder() -> TagMapBuilder {
        TagMapBuilder::recording(BTreeMap::new())
    }

    /// Starts a recording builder seeded with this map's entries.
    pub fn to_builder(&self) -> TagMapBuilder {
        TagMapBuilder::recording((*self.entries).clone())
    }
}

/// Builder for [`TagMap`].
///
/// A builder is either recording (entries are kept) or discarding (entries are
/// dropped and [`build`](Self::build) yields the empty map). The discarding
/// variant backs the no-op tagger: it honours the full builder contract while
/// never retaining content.
#[derive(Debug)]
pub struct TagMapBuilder {
    entries: BTreeMap<TagKey, Entry>,
    recording: bool,
}

impl TagMapBuilder {
    fn recording(entries: BTreeMap<TagKey, Entry>) -> Self {
        Self {
            entries,
            recording: true,
        }
    }

    pub(crate) fn discarding() -> Self {
        Self {
            entries: BTreeMap::new(),
            recording: false,
        }
    }

    /// Inserts or replaces a tag. Keys and values carry their own validation,
    /// so this cannot fail.
    pub fn put(mut self, key: TagKey, value: TagValue, metadata: TagMetadata) -> Self {
        if self.recording {
            self.entries.insert(key, Entry { value, metadata });
        }
        self
    }

    pub fn remove(mut self, key: &TagKey) -> Self {
        self.entries.remove(key);
        self
    }

    pub fn build(self) -> TagMap {
        TagMap {
            entries: Arc::new(self.entries),
        }
    }

    /// Builds the map and attaches it to the ambient context, returning the
    /// scope that restores the previous map on release.
    pub fn build_scoped(self) -> Scope {
        context::attach(self.build())
    }
}
