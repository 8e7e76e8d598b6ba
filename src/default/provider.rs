use std::sync::Arc;

use crate::api::{Meter, Tagger, Tracer};
use crate::context::{self, Scope};
use crate::error::Error;
use crate::propagation::{BinaryFormat, Extractor, Injector, TextFormat};
use crate::tags::{TagMap, TagMapBuilder};

/// Tracer that records nothing.
#[derive(Debug, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {}

/// Meter that records nothing.
#[derive(Debug, Default)]
pub struct NoopMeter;

impl Meter for NoopMeter {}

/// Tagger that keeps scope mechanics honest while never retaining content.
#[derive(Debug)]
pub struct NoopTagger {
    binary: Arc<NoopBinaryFormat>,
    text: Arc<NoopTextFormat>,
}

impl NoopTagger {
    pub fn new() -> Self {
        Self {
            binary: Arc::new(NoopBinaryFormat),
            text: Arc::new(NoopTextFormat),
        }
    }
}

impl Default for NoopTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl Tagger for NoopTagger {
    fn current_tag_map(&self) -> TagMap {
        context::current()
    }

    fn tag_map_builder(&self) -> TagMapBuilder {
        TagMapBuilder::discarding()
    }

    fn to_builder(&self, _tags: &TagMap) -> TagMapBuilder {
        TagMapBuilder::discarding()
    }

    fn current_builder(&self) -> TagMapBuilder {
        TagMapBuilder::discarding()
    }

    fn with_tag_map(&self, _tags: TagMap) -> Scope {
        // Real attach/release bookkeeping; the observed value stays empty.
        context::attach(TagMap::empty())
    }

    fn binary_format(&self) -> Arc<dyn BinaryFormat> {
        self.binary.clone()
    }

    fn text_format(&self) -> Arc<dyn TextFormat> {
        self.text.clone()
    }
}

/// Binary codec that encodes nothing and decodes the empty map.
#[derive(Debug, Default)]
pub struct NoopBinaryFormat;

impl BinaryFormat for NoopBinaryFormat {
    fn to_bytes(&self, _tags: &TagMap) -> Vec<u8> {
        Vec::new()
    }

    fn from_bytes(&self, _bytes: &[u8]) -> Result<TagMap, Error> {
        Ok(TagMap::empty())
    }
}

/// Text codec that advertises no fields and touches no carrier.
#[derive(Debug, Default)]
pub struct NoopTextFormat;

impl TextFormat for NoopTextFormat {
    fn fields(&self) -> &[&'static str] {
        &[]
    }

    fn inject(&self, _tags: &TagMap, _carrier: &mut dyn Injector) {}

    fn extract(&self, _carrier: &dyn Extractor) -> Result<TagMap, Error> {
        Ok(TagMap::empty())
    }
}
