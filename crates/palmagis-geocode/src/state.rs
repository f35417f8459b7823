//! Runtime enable/disable state for the provider chain.

use std::sync::atomic::{AtomicBool, Ordering};

use palmagis_core::{ProviderKind, ProviderRegistry};

/// One runtime flag per provider, seeded from the static registry.
///
/// The only mutation is [`ResolverState::disable`], tripped when a provider
/// rejects our credentials. The breaker is one-way: there is no reset short
/// of a process restart. Relaxed atomics are enough — the contract only
/// needs eventual visibility, and a race between two requests disabling the
/// same provider is harmless.
#[derive(Debug)]
pub struct ResolverState {
    flags: [AtomicBool; ProviderKind::ALL.len()],
}

impl ResolverState {
    #[must_use]
    pub fn new(registry: &ProviderRegistry) -> Self {
        let flags = ProviderKind::ALL.map(|kind| AtomicBool::new(registry.settings(kind).enabled));
        Self { flags }
    }

    #[must_use]
    pub fn is_enabled(&self, kind: ProviderKind) -> bool {
        self.flags[Self::index(kind)].load(Ordering::Relaxed)
    }

    /// Trip the circuit breaker for `kind` for the rest of the process
    /// lifetime.
    pub fn disable(&self, kind: ProviderKind) {
        if self.flags[Self::index(kind)].swap(false, Ordering::Relaxed) {
            tracing::warn!(provider = %kind, "provider disabled until restart");
        }
    }

    fn index(kind: ProviderKind) -> usize {
        ProviderKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_seeds_from_registry() {
        let state = ResolverState::new(&ProviderRegistry::default());
        for kind in ProviderKind::ALL {
            assert!(state.is_enabled(kind), "{kind} should start enabled");
        }
    }

    #[test]
    fn disable_is_one_way() {
        let state = ResolverState::new(&ProviderRegistry::default());
        state.disable(ProviderKind::GoogleMaps);
        assert!(!state.is_enabled(ProviderKind::GoogleMaps));
        // A second trip is a no-op, not an error.
        state.disable(ProviderKind::GoogleMaps);
        assert!(!state.is_enabled(ProviderKind::GoogleMaps));
        assert!(state.is_enabled(ProviderKind::Nominatim));
    }
}
