use std::env;

use crate::api::Capability;

/// Selection hints for provider resolution, one optional hint per capability.
///
/// A hint names the fully-qualified identifier of the desired provider. An
/// absent (or empty) hint means "first registered candidate, if any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub tracer_provider: Option<String>,
    pub meter_provider: Option<String>,
    pub tagger_provider: Option<String>,
}

impl Config {
    /// Config with no hints: every capability resolves to the first registered
    /// candidate or falls back to its no-op default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads hints from the environment.
    ///
    /// Consults `TELEMETRY_TRACER_PROVIDER`, `TELEMETRY_METER_PROVIDER` and
    /// `TELEMETRY_TAGGER_PROVIDER`; unset or empty variables mean no hint.
    pub fn from_env() -> Self {
        Self {
            tracer_provider: read_hint(Capability::Tracer),
            meter_provider: read_hint(Capability::Meter),
            tagger_provider: read_hint(Capability::Tagger),
        }
    }

    pub fn with_tracer_provider(mut self, id: impl Into<String>) -> Self {
        self.tracer_provider = Some(id.into());
        self
    }

    pub fn with_meter_provider(mut self, id: impl Into<String>) -> Self {
        self.meter_provider = Some(id.into());
        self
    }

    pub fn with_tagger_provider(mut self, id: impl Into<String>) -> Self {
        self.tagger_provider = Some(id.into());
        self
    }

    /// The hint configured for `capability`, if any.
    pub fn hint(&self, capability: Capability) -> Option<&str> {
        match capability {
            Capability::Tracer => self.tracer_provider.as_deref(),
            Capability::Meter => self.meter_provider.as_deref(),
            Capability::Tagger => self.tagger_provider.as_deref(),
        }
    }
}

fn read_hint(capability: Capability) -> Option<String> {
    env::var(capability.hint_key()).ok().filter(|v| !v.is_empty())
}
