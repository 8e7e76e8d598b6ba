//! Pluggable telemetry capability resolution with scoped tag-context
//! propagation.
//!
//! This crate is the wiring between an application and whatever telemetry
//! backend it ships with: it resolves one provider per capability (tracer,
//! meter, tagger), exposes the resolved instances through a lazily
//! initialized process-wide facade, and carries a tag map in the ambient
//! execution context so cross-cutting attributes follow a unit of work.
//! When no provider is registered, every capability falls back to a no-op
//! default that honours the full contract with trivial effects.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! // Plugins register their providers before the first accessor call.
//! telemetry_api::global::register_tracer_provider(Arc::new(MyTracerProvider));
//!
//! // First access resolves all capabilities exactly once.
//! let tracer = telemetry_api::global::tracer()?;
//! let tagger = telemetry_api::global::tagger()?;
//!
//! // Tags attach to the current execution context for the scope's lifetime.
//! let tags = telemetry_api::TagMap::builder()
//!     .put(TagKey::new("env")?, TagValue::new("prod")?, TagMetadata::default())
//!     .build();
//! let _scope = tagger.with_tag_map(tags);
//! ```
//!
//! # Selection Hints
//!
//! A hint pins a capability to one provider by its identifier. An unmatched
//! non-empty hint fails the first accessor call loudly; silent fallback to the
//! no-op default only happens when no hint is set at all.
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `TELEMETRY_TRACER_PROVIDER` | Tracer provider identifier | first registered |
//! | `TELEMETRY_METER_PROVIDER` | Meter provider identifier | first registered |
//! | `TELEMETRY_TAGGER_PROVIDER` | Tagger provider identifier | first registered |
//!
//! # Module Structure
//!
//! - [`api`]: capability and provider contracts
//! - [`config`]: selection-hint configuration
//! - [`context`]: ambient tag-map carrier and scoped attachment
//! - [`default`]: no-op fallback implementations
//! - [`error`]: error types
//! - [`global`]: process-wide facade
//! - [`propagation`]: codec contracts for crossing process boundaries
//! - [`registry`]: provider candidate resolution
//! - [`tags`]: the tag data model

pub mod api;
pub mod config;
pub mod context;
pub mod default;
pub mod error;
pub mod global;
pub mod propagation;
pub mod registry;
pub mod tags;

// Re-exports
pub use api::{Capability, Meter, MeterProvider, Provider, Tagger, TaggerProvider, Tracer, TracerProvider};
pub use config::Config;
pub use context::{FutureExt, Scope};
pub use error::Error;
pub use registry::ProviderRegistry;
pub use tags::{TagKey, TagMap, TagMapBuilder, TagMetadata, TagTtl, TagValue};
