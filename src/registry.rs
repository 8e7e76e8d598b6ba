//! Provider candidate enumeration and resolution.
//!
//! The registry owns whatever candidates were handed to it and resolves at
//! most one per capability. Resolution itself caches nothing; the facade in
//! [`crate::global`] holds the resolved instances for the process lifetime.

use std::sync::Arc;

use tracing::debug;

use crate::api::{
    Capability, Meter, MeterProvider, Provider, Tagger, TaggerProvider, Tracer, TracerProvider,
};
use crate::error::Error;

/// Picks a candidate from `candidates` in registration order.
///
/// A non-empty hint must match a candidate's identifier exactly; a miss is a
/// fatal configuration error. Without a hint the first candidate wins, and an
/// empty candidate list is not an error.
fn select<P>(
    candidates: &[Arc<P>],
    capability: Capability,
    hint: Option<&str>,
) -> Result<Option<Arc<P>>, Error>
where
    P: Provider + ?Sized,
{
    match hint {
        Some(hint) if !hint.is_empty() => candidates
            .iter()
            .find(|c| c.id() == hint)
            .cloned()
            .map(Some)
            .ok_or_else(|| {
                Error::Configuration(format!("{capability} provider `{hint}` not found"))
            }),
        _ => Ok(candidates.first().cloned()),
    }
}

/// Holds the registered provider candidates for all capabilities.
#[derive(Default)]
pub struct ProviderRegistry {
    tracers: Vec<Arc<dyn TracerProvider>>,
    meters: Vec<Arc<dyn MeterProvider>>,
    taggers: Vec<Arc<dyn TaggerProvider>>,
}

impl ProviderRegistry {
    pub const fn new() -> Self {
        Self {
            tracers: Vec::new(),
            meters: Vec::new(),
            taggers: Vec::new(),
        }
    }

    pub fn register_tracer_provider(&mut self, provider: Arc<dyn TracerProvider>) {
        debug!(id = provider.id(), "registered tracer provider");
        self.tracers.push(provider);
    }

    pub fn register_meter_provider(&mut self, provider: Arc<dyn MeterProvider>) {
        debug!(id = provider.id(), "registered meter provider");
        self.meters.push(provider);
    }

    pub fn register_tagger_provider(&mut self, provider: Arc<dyn TaggerProvider>) {
        debug!(id = provider.id(), "registered tagger provider");
        self.taggers.push(provider);
    }

    pub fn is_empty(&self) -> bool {
        self.tracers.is_empty() && self.meters.is_empty() && self.taggers.is_empty()
    }

    /// Resolves a tracer instance, or `None` when no candidate is registered
    /// and no hint was given.
    pub fn resolve_tracer(&self, hint: Option<&str>) -> Result<Option<Arc<dyn Tracer>>, Error> {
        Ok(select(&self.tracers, Capability::Tracer, hint)?.map(|p| p.create()))
    }

    pub fn resolve_meter(&self, hint: Option<&str>) -> Result<Option<Arc<dyn Meter>>, Error> {
        Ok(select(&self.meters, Capability::Meter, hint)?.map(|p| p.create()))
    }

    pub fn resolve_tagger(&self, hint: Option<&str>) -> Result<Option<Arc<dyn Tagger>>, Error> {
        Ok(select(&self.taggers, Capability::Tagger, hint)?.map(|p| p.create()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default::NoopTracer;

    #[derive(Debug)]
    struct FakeTracerProvider {
        id: &'static str,
    }

    impl Provider for FakeTracerProvider {
        fn id(&self) -> &str {
            self.id
        }
    }

    impl TracerProvider for FakeTracerProvider {
        fn create(&self) -> Arc<dyn Tracer> {
            Arc::new(NoopTracer)
        }
    }

    fn registry_with(ids: &[&'static str]) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        for id in ids {
            registry.register_tracer_provider(Arc::new(FakeTracerProvider { id }));
        }
        registry
    }

    #[test]
    fn no_hint_returns_first_registered_candidate() {
        let registry = registry_with(&["first", "second"]);

        let resolved = registry.resolve_tracer(None).unwrap();

        assert!(resolved.is_some());
    }

    #[test]
    fn no_hint_and_no_candidates_is_not_an_error() {
        let registry = ProviderRegistry::new();

        let resolved = registry.resolve_tracer(None).unwrap();

        assert!(resolved.is_none());
    }

    #[test]
    fn matching_hint_selects_that_candidate_exactly() {
        let registry = registry_with(&["first", "second"]);

        // select() must return the hinted candidate, not the first one.
        let candidate = select(
            &registry.tracers,
            Capability::Tracer,
            Some("second"),
        )
        .unwrap()
        .unwrap();

        assert_eq!(candidate.id(), "second");
    }

    #[test]
    fn unmatched_hint_is_a_configuration_error() {
        let registry = registry_with(&["first"]);

        let err = registry.resolve_tracer(Some("missing")).unwrap_err();

        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn unmatched_hint_fails_even_with_no_candidates() {
        let registry = ProviderRegistry::new();

        let err = registry.resolve_tracer(Some("anything")).unwrap_err();

        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn empty_hint_behaves_like_no_hint() {
        let registry = registry_with(&["first"]);

        let resolved = registry.resolve_tracer(Some("")).unwrap();

        assert!(resolved.is_some());
    }

    #[test]
    fn resolution_is_deterministic_for_a_fixed_registration_order() {
        let registry = registry_with(&["a", "b", "c"]);

        for _ in 0..3 {
            let candidate = select(&registry.tracers, Capability::Tracer, None)
                .unwrap()
                .unwrap();
            assert_eq!(candidate.id(), "a");
        }
    }
}
