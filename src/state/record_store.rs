use std::sync::{Arc, RwLock};

use crate::error::{AppError, Result};
use crate::types::{Baseline, City, Customer, Order, ProductPrice};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Immutable view of every source collection at one point in time.
/// Aggregators only ever see a whole snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub customers: Vec<Customer>,
    pub orders: Vec<Order>,
    pub prices: Vec<ProductPrice>,
    pub cities: Vec<City>,
    pub baseline: Baseline,
    /// Nanosecond UTC epoch of the seed this snapshot was loaded from.
    /// None until `initialize-data` has run at least once.
    pub seeded_at_ns: Option<u64>,
}

impl Snapshot {
    /// Snapshot of an uninitialized store. The simulator still has a baseline to work with.
    pub fn empty(baseline: Baseline) -> Self {
        Self {
            customers: Vec::new(),
            orders: Vec::new(),
            prices: Vec::new(),
            cities: Vec::new(),
            baseline,
            seeded_at_ns: None,
        }
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded_at_ns.is_some()
    }

    /// `EmptyDataset` if nothing has been seeded. Callers treat this as a signal
    /// to serve zeroed views, never as a failure.
    pub fn ensure_seeded(&self) -> Result<()> {
        if self.is_seeded() {
            Ok(())
        } else {
            Err(AppError::EmptyDataset)
        }
    }
}

// ---------------------------------------------------------------------------
// RecordStore
// ---------------------------------------------------------------------------

/// Holder of the current snapshot. Readers clone the `Arc` and release the lock
/// immediately; a reseed builds the next snapshot off-lock and swaps it in whole.
pub struct RecordStore {
    current: RwLock<Arc<Snapshot>>,
}

impl RecordStore {
    pub fn new(initial: Snapshot) -> Arc<Self> {
        Arc::new(Self {
            current: RwLock::new(Arc::new(initial)),
        })
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&*guard)
    }

    /// Install `next` and return the snapshot it replaced.
    pub fn replace(&self, next: Snapshot) -> Arc<Snapshot> {
        let next = Arc::new(next);
        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, next)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Segment;

    fn baseline() -> Baseline {
        Baseline {
            baseline_orders: 1000,
            baseline_avg_order_value: 500.0,
            fixed_operating_costs: 100_000.0,
            cost_of_goods_ratio: 0.0,
        }
    }

    fn customer(id: &str) -> Customer {
        Customer {
            id: id.to_string(),
            name: id.to_string(),
            email: format!("{id}@example.com"),
            segment: Segment::Regular,
            avg_order_value: 600.0,
            total_orders: 3,
            retention_rate: 60.0,
            last_order_date: "2025-01-01".to_string(),
            city: "Delhi".to_string(),
        }
    }

    #[test]
    fn empty_store_reports_empty_dataset() {
        let store = RecordStore::new(Snapshot::empty(baseline()));
        let snap = store.snapshot();
        assert!(!snap.is_seeded());
        assert!(matches!(snap.ensure_seeded(), Err(AppError::EmptyDataset)));
        assert_eq!(snap.baseline, baseline());
    }

    #[test]
    fn readers_keep_the_snapshot_they_took() {
        let store = RecordStore::new(Snapshot::empty(baseline()));
        let before = store.snapshot();

        let mut next = Snapshot::empty(baseline());
        next.customers = vec![customer("a"), customer("b")];
        next.seeded_at_ns = Some(1);
        let replaced = store.replace(next);

        assert!(Arc::ptr_eq(&before, &replaced));
        assert!(before.customers.is_empty());
        let after = store.snapshot();
        assert_eq!(after.customers.len(), 2);
        assert!(after.ensure_seeded().is_ok());
    }

    #[test]
    fn concurrent_readers_never_see_partial_snapshots() {
        let store = RecordStore::new(Snapshot::empty(baseline()));
        let writer_store = Arc::clone(&store);

        let writer = std::thread::spawn(move || {
            for n in 1..=50 {
                let mut next = Snapshot::empty(baseline());
                next.customers = (0..n).map(|i| customer(&format!("c{i}"))).collect();
                next.seeded_at_ns = Some(n as u64);
                writer_store.replace(next);
            }
        });

        for _ in 0..500 {
            let snap = store.snapshot();
            if let Some(stamp) = snap.seeded_at_ns {
                assert_eq!(snap.customers.len() as u64, stamp);
            } else {
                assert!(snap.customers.is_empty());
            }
        }
        writer.join().unwrap();
    }
}
