//! Process-wide telemetry facade.
//!
//! The facade resolves one instance per capability exactly once, lazily, on
//! the first accessor call. Resolution consults the providers registered via
//! [`register_tracer_provider`] and friends, filtered by the selection hints
//! from [`Config::from_env`]. Capabilities without a registered provider fall
//! back to the no-op defaults in [`crate::default`].
//!
//! A failed initialization publishes nothing: the next accessor call attempts
//! initialization again. This matters when a hint names a provider whose
//! registration simply has not happened yet.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::api::{
    Capability, Meter, MeterProvider, Tagger, TaggerProvider, Tracer,
    TracerProvider,
};
use crate::config::Config;
use crate::default::{NoopMeter, NoopTagger, NoopTracer};
use crate::error::Error;
use crate::registry::ProviderRegistry;

static INSTANCE: RwLock<Option<Arc<Telemetry>>> = RwLock::new(None);
static PROVIDERS: Mutex<ProviderRegistry> = Mutex::new(ProviderRegistry::new());

/// One resolved instance per capability. Immutable once constructed.
#[derive(Debug)]
pub struct Telemetry {
    tracer: Arc<dyn Tracer>,
    meter: Arc<dyn Meter>,
    tagger: Arc<dyn Tagger>,
}

impl Telemetry {
    /// Resolves every capability against `registry` using the hints in
    /// `config`. An unmatched non-empty hint aborts the whole resolution; no
    /// partial facade is ever returned.
    pub fn resolve(registry: &ProviderRegistry, config: &Config) -> Result<Self, Error> {
        let tracer: Arc<dyn Tracer> = match registry.resolve_tracer(config.hint(Capability::Tracer))? {
            Some(tracer) => tracer,
            None => {
                debug!("no tracer provider registered, using the no-op default");
                Arc::new(NoopTracer)
            }
        };
        let meter: Arc<dyn Meter> = match registry.resolve_meter(config.hint(Capability::Meter))? {
            Some(meter) => meter,
            None => {
                debug!("no meter provider registered, using the no-op default");
                Arc::new(NoopMeter)
            }
        };
        let tagger: Arc<dyn Tagger> = match registry.resolve_tagger(config.hint(Capability::Tagger))? {
            Some(tagger) => tagger,
            None => {
                debug!("no tagger provider registered, using the no-op default");
                Arc::new(NoopTagger::new())
            }
        };

        Ok(Self {
            tracer,
            meter,
            tagger,
        })
    }

    pub fn tracer(&self) -> Arc<dyn Tracer> {
        self.tracer.clone()
    }

    pub fn meter(&self) -> Arc<dyn Meter> {
        self.meter.clone()
    }

    pub fn tagger(&self) -> Arc<dyn Tagger> {
        self.tagger.clone()
    }
}

/// Registers a tracer provider candidate for the process-wide facade.
///
/// Must happen before the first accessor call; later registrations are kept
/// but never observed, since the facade resolves exactly once.
pub fn register_tracer_provider(provider: Arc<dyn TracerProvider>) {
    warn_if_initialized(provider.id());
    lock_providers().register_tracer_provider(provider);
}

/// Registers a meter provider candidate for the process-wide facade.
pub fn register_meter_provider(provider: Arc<dyn MeterProvider>) {
    warn_if_initialized(provider.id());
    lock_providers().register_meter_provider(provider);
}

/// Registers a tagger provider candidate for the process-wide facade.
pub fn register_tagger_provider(provider: Arc<dyn TaggerProvider>) {
    warn_if_initialized(provider.id());
    lock_providers().register_tagger_provider(provider);
}

/// Returns the process-wide tracer, initializing the facade if needed.
pub fn tracer() -> Result<Arc<dyn Tracer>, Error> {
    Ok(instance()?.tracer())
}

/// Returns the process-wide meter, initializing the facade if needed.
pub fn meter() -> Result<Arc<dyn Meter>, Error> {
    Ok(instance()?.meter())
}

/// Returns the process-wide tagger, initializing the facade if needed.
pub fn tagger() -> Result<Arc<dyn Tagger>, Error> {
    Ok(instance()?.tagger())
}

/// Eagerly initializes the facade with hints from the environment.
pub fn init() -> Result<Arc<Telemetry>, Error> {
    instance()
}

/// Eagerly initializes the facade with an explicit config.
///
/// Fails with [`Error::AlreadyInitialized`] once a facade exists; a facade
/// built from one config is never silently replaced by another.
pub fn init_with_config(config: &Config) -> Result<Arc<Telemetry>, Error> {
    let mut slot = INSTANCE.write().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        return Err(Error::AlreadyInitialized);
    }
    let telemetry = build(config)?;
    *slot = Some(Arc::clone(&telemetry));
    Ok(telemetry)
}

/// Clears the facade and all registered providers so the next accessor call
/// reinitializes from scratch. Test harness use only.
#[cfg(any(test, feature = "test-util"))]
pub fn reset() {
    *INSTANCE.write().unwrap_or_else(PoisonError::into_inner) = None;
    *lock_providers() = ProviderRegistry::new();
}

fn instance() -> Result<Arc<Telemetry>, Error> {
    if let Some(telemetry) = read_instance() {
        return Ok(telemetry);
    }

    let mut slot = INSTANCE.write().unwrap_or_else(PoisonError::into_inner);
    // Another caller may have won the race between the read and write locks.
    if let Some(telemetry) = slot.as_ref() {
        return Ok(Arc::clone(telemetry));
    }

    let telemetry = build(&Config::from_env())?;
    *slot = Some(Arc::clone(&telemetry));
    Ok(telemetry)
}

fn build(config: &Config) -> Result<Arc<Telemetry>, Error> {
    let providers = lock_providers();
    let telemetry = Arc::new(Telemetry::resolve(&providers, config)?);
    debug!("telemetry facade initialized");
    Ok(telemetry)
}

fn read_instance() -> Option<Arc<Telemetry>> {
    INSTANCE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

fn lock_providers() -> std::sync::MutexGuard<'static, ProviderRegistry> {
    PROVIDERS.lock().unwrap_or_else(PoisonError::into_inner)
}

fn warn_if_initialized(id: &str) {
    if read_instance().is_some() {
        warn!(
            id,
            "provider registered after telemetry initialization; it will not be observed"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::api::Provider;

    // Tests below mutate the process-wide facade; serialize them.
    fn guard() -> std::sync::MutexGuard<'static, ()> {
        crate::test_support::process_lock()
    }

    #[derive(Debug)]
    struct TestTracer;

    impl Tracer for TestTracer {}

    struct CountingTracerProvider {
        id: &'static str,
        created: AtomicUsize,
    }

    impl CountingTracerProvider {
        fn new(id: &'static str) -> Arc<Self> {
            Arc::new(Self {
                id,
                created: AtomicUsize::new(0),
            })
        }
    }

    impl Provider for CountingTracerProvider {
        fn id(&self) -> &str {
            self.id
        }
    }

    impl TracerProvider for CountingTracerProvider {
        fn create(&self) -> Arc<dyn Tracer> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Arc::new(TestTracer)
        }
    }

    fn is_noop(tracer: &Arc<dyn Tracer>) -> bool {
        format!("{tracer:?}") == "NoopTracer"
    }

    #[test]
    fn resolve_substitutes_noop_defaults_when_nothing_is_registered() {
        let telemetry =
            Telemetry::resolve(&ProviderRegistry::new(), &Config::new()).unwrap();

        assert!(is_noop(&telemetry.tracer()));
        assert_eq!(format!("{:?}", telemetry.meter()), "NoopMeter");
    }

    #[test]
    fn resolve_prefers_a_registered_candidate_over_the_default() {
        let mut registry = ProviderRegistry::new();
        registry.register_tracer_provider(CountingTracerProvider::new("acme.tracer"));

        let telemetry = Telemetry::resolve(&registry, &Config::new()).unwrap();

        assert!(!is_noop(&telemetry.tracer()));
    }

    #[test]
    fn resolve_fails_on_an_unmatched_hint() {
        let mut registry = ProviderRegistry::new();
        registry.register_tracer_provider(CountingTracerProvider::new("acme.tracer"));

        let err = Telemetry::resolve(
            &registry,
            &Config::new().with_tracer_provider("other.tracer"),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn accessors_are_reference_stable() {
        let _guard = guard();
        reset();

        let first = tagger().unwrap();
        let second = tagger().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn concurrent_first_access_initializes_exactly_once() {
        let _guard = guard();
        reset();

        let provider = CountingTracerProvider::new("acme.tracer");
        register_tracer_provider(provider.clone());

        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| tracer().unwrap()))
            .collect();
        let tracers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(provider.created.load(Ordering::SeqCst), 1);
        for tracer in &tracers[1..] {
            assert!(Arc::ptr_eq(&tracers[0], tracer));
        }
    }

    #[test]
    fn failed_initialization_allows_retry() {
        let _guard = guard();
        reset();

        register_tracer_provider(CountingTracerProvider::new("acme.tracer"));

        let err = init_with_config(&Config::new().with_tracer_provider("missing"))
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));

        // Nothing was published, so a corrected config succeeds.
        let telemetry =
            init_with_config(&Config::new().with_tracer_provider("acme.tracer")).unwrap();
        assert!(!is_noop(&telemetry.tracer()));
    }

    #[test]
    fn explicit_init_refuses_to_replace_an_existing_facade() {
        let _guard = guard();
        reset();

        init_with_config(&Config::new()).unwrap();
        let err = init_with_config(&Config::new()).unwrap_err();

        assert!(matches!(err, Error::AlreadyInitialized));
    }

    #[test]
    fn registration_after_initialization_is_not_observed() {
        let _guard = guard();
        reset();

        init_with_config(&Config::new()).unwrap();
        register_tracer_provider(CountingTracerProvider::new("late.tracer"));

        assert!(is_noop(&tracer().unwrap()));
    }
}
