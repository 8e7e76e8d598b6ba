//! No-op capability implementations.
//!
//! These are the implementations the facade falls back to when no provider is
//! registered for a capability. They satisfy the same contracts as any real
//! implementation with trivial effects: the tagger performs real scope
//! bookkeeping but the observed tag map is always empty, and the propagation
//! formats encode nothing and decode the empty map.

mod provider;

pub use provider::{NoopBinaryFormat, NoopMeter, NoopTagger, NoopTextFormat, NoopTracer};
