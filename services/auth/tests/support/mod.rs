//! Shared fixtures for the integration tests

#![allow(dead_code)]

use auth::repositories::MemoryStore;
use auth::test_support::{ManualClock, epoch, fast_hasher, secret};
use auth::{AuthService, DenialPolicy, ServiceOptions, SessionIssuer, TodoGate};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub const TTL: std::time::Duration = std::time::Duration::from_secs(86_400);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn issuer(clock: &ManualClock) -> SessionIssuer {
    SessionIssuer::new(&secret(), TTL, clock.clock()).unwrap()
}

/// Everything a test needs, wired over one in-memory store.
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub clock: ManualClock,
    pub service: AuthService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_options(ServiceOptions::default())
    }

    pub fn with_options(options: ServiceOptions) -> Self {
        init_tracing();
        let store = Arc::new(MemoryStore::new());
        let clock = ManualClock::new(epoch());
        let service =
            AuthService::new(store.clone(), fast_hasher(), issuer(&clock), options).unwrap();

        Self {
            store,
            clock,
            service,
        }
    }

    pub fn gate(&self, policy: DenialPolicy) -> TodoGate {
        TodoGate::new(
            self.service.guard(),
            self.store.clone(),
            policy,
            std::time::Duration::from_secs(1),
        )
    }
}
