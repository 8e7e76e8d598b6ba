//! Carrier-agnostic codecs for moving tag maps across process boundaries.
//!
//! Only the contracts live here; this crate ships no real codec. The no-op
//! implementations in [`crate::default`] satisfy the same postconditions with
//! trivial effects.

use std::fmt;

use crate::error::Error;
use crate::tags::TagMap;

/// Serializes tag maps to and from a compact byte representation.
pub trait BinaryFormat: Send + Sync + fmt::Debug {
    fn to_bytes(&self, tags: &TagMap) -> Vec<u8>;

    /// Decodes a tag map. Fails with [`Error::InvalidArgument`] on input the
    /// codec cannot interpret.
    fn from_bytes(&self, bytes: &[u8]) -> Result<TagMap, Error>;
}

/// Writes key/value pairs into a text-based carrier, one header per field.
pub trait Injector {
    fn set(&mut self, key: &str, value: String);
}

/// Reads key/value pairs back out of a text-based carrier.
pub trait Extractor {
    fn get(&self, key: &str) -> Option<&str>;
}

/// Serializes tag maps into text-based carriers such as HTTP headers.
pub trait TextFormat: Send + Sync + fmt::Debug {
    /// The carrier fields this format reads and writes.
    fn fields(&self) -> &[&'static str];

    fn inject(&self, tags: &TagMap, carrier: &mut dyn Injector);

    fn extract(&self, carrier: &dyn Extractor) -> Result<TagMap, Error>;
}

impl Injector for std::collections::HashMap<String, String> {
    fn set(&mut self, key: &str, value: String) {
        self.insert(key.to_owned(), value);
    }
}

impl Extractor for std::collections::HashMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}
