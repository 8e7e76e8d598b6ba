//! Capability and provider contracts.
//!
//! The three telemetry capabilities (tracer, meter, tagger) are opaque to this
//! crate: it resolves them, substitutes no-op defaults, and hands them out. A
//! provider is a named factory for one capability implementation; providers are
//! registered explicitly (there is no reflective discovery), and the selection
//! hint in [`Config`](crate::config::Config) picks one by its identifier.

use std::fmt;
use std::sync::Arc;

use crate::context::Scope;
use crate::propagation::{BinaryFormat, TextFormat};
use crate::tags::{TagMap, TagMapBuilder};

/// Records spans. The core only routes instances around; the actual tracing
/// surface belongs to implementations.
pub trait Tracer: Send + Sync + fmt::Debug {}

/// Records measurements. Same story as [`Tracer`]: opaque to the core.
pub trait Meter: Send + Sync + fmt::Debug {}

/// Manages the ambient tag context.
pub trait Tagger: Send + Sync + fmt::Debug {
    /// The tag map currently attached to the calling execution context.
    fn current_tag_map(&self) -> TagMap;

    /// A builder seeded with no tags.
    fn tag_map_builder(&self) -> TagMapBuilder;

    /// A builder seeded with the given map's tags.
    fn to_builder(&self, tags: &TagMap) -> TagMapBuilder;

    /// A builder seeded with the current context's tags.
    fn current_builder(&self) -> TagMapBuilder;

    /// Attaches `tags` to the calling execution context until the returned
    /// scope is released.
    fn with_tag_map(&self, tags: TagMap) -> Scope;

    /// Wire codec for tag maps.
    fn binary_format(&self) -> Arc<dyn BinaryFormat>;

    /// Header codec for tag maps.
    fn text_format(&self) -> Arc<dyn TextFormat>;
}

/// Common contract of every provider candidate: a stable identifier used for
/// hint matching.
pub trait Provider: Send + Sync {
    /// Fully-qualified identifier of this candidate, matched exactly against
    /// the selection hint.
    fn id(&self) -> &str;
}

/// Factory for a [`Tracer`] implementation.
pub trait TracerProvider: Provider {
    fn create(&self) -> Arc<dyn Tracer>;
}

/// Factory for a [`Meter`] implementation.
pub trait MeterProvider: Provider {
    fn create(&self) -> Arc<dyn Meter>;
}

/// Factory for a [`Tagger`] implementation.
pub trait TaggerProvider: Provider {
    fn create(&self) -> Arc<dyn Tagger>;
}

/// The closed set of pluggable capabilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    Tracer,
    Meter,
    Tagger,
}

impl Capability {
    pub const ALL: [Capability; 3] = [Capability::Tracer, Capability::Meter, Capability::Tagger];

    pub fn name(&self) -> &'static str {
        match self {
            Capability::Tracer => "tracer",
            Capability::Meter => "meter",
            Capability::Tagger => "tagger",
        }
    }

    /// Environment variable consulted for this capability's selection hint.
    pub fn hint_key(&self) -> &'static str {
        match self {
            Capability::Tracer => "TELEMETRY_TRACER_PROVIDER",
            Capability::Meter => "TELEMETRY_METER_PROVIDER",
            Capability::Tagger => "TELEMETRY_TAGGER_PROVIDER",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_names_are_stable() {
        assert_eq!(Capability::Tracer.name(), "tracer");
        assert_eq!(Capability::Meter.name(), "meter");
        assert_eq!(Capability::Tagger.name(), "tagger");
    }

    #[test]
    fn hint_keys_are_distinct() {
        let keys: std::collections::HashSet<_> =
            Capability::ALL.iter().map(|c| c.hint_key()).collect();

        assert_eq!(keys.len(), Capability::ALL.len());
    }
}
