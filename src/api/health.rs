//! Shared health state for the /api/health endpoint.
//! Updated by the seeding and scenario handlers.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Shared health counters. Updated by handlers, read by the health endpoint.
#[derive(Default)]
pub struct HealthState {
    /// True once the record store holds a seed.
    pub initialized: AtomicBool,
    /// Nanosecond timestamp of the last successful seed (0 = none).
    pub last_seeded_at_ns: AtomicU64,
    /// Successful `initialize-data` runs since startup.
    pub seed_runs: AtomicU64,
    /// Scenarios evaluated since startup, rejected inputs excluded.
    pub scenarios_evaluated: AtomicU64,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_seeded(&self, ns: u64) {
        self.initialized.store(true, Ordering::Relaxed);
        self.last_seeded_at_ns.store(ns, Ordering::Relaxed);
    }

    pub fn inc_seed_runs(&self) {
        self.seed_runs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_scenarios_evaluated(&self) {
        self.scenarios_evaluated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn initialized(&self) -> bool {
        self.initialized.load(Ordering::Relaxed)
    }

    pub fn last_seeded_at_ns(&self) -> u64 {
        self.last_seeded_at_ns.load(Ordering::Relaxed)
    }

    pub fn seed_runs(&self) -> u64 {
        self.seed_runs.load(Ordering::Relaxed)
    }

    pub fn scenarios_evaluated(&self) -> u64 {
        self.scenarios_evaluated.load(Ordering::Relaxed)
    }
}
