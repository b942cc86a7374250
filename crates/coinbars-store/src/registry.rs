//! Resident datasets behind per-key locks.

use coinbars_types::{Dataset, DatasetKey};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OwnedMutexGuard;

/// Slot holding the resident dataset of one key; `None` if not resident.
pub type DatasetSlot = Arc<tokio::sync::Mutex<Option<Dataset>>>;

/// Registry of resident datasets.
///
/// Every [`DatasetKey`] owns one async mutex, created on first use. Holding
/// its guard is the critical section for that dataset, and the guarded value
/// is the resident copy. Code that needs both the 1-minute and a coarser
/// dataset of a symbol always locks the 1-minute key first.
///
/// The async accessors lock the slot, so they must not be called for a key
/// whose guard the caller already holds.
#[derive(Debug, Default)]
pub struct DatasetRegistry {
    slots: Mutex<HashMap<DatasetKey, DatasetSlot>>,
}

impl DatasetRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot for `key`, creating it on first use.
    #[must_use]
    pub fn slot(&self, key: &DatasetKey) -> DatasetSlot {
        // The map only ever grows, a poisoned guard still holds a valid map
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(key.clone()).or_default())
    }

    /// Enters the critical section for `key`.
    pub async fn lock(&self, key: &DatasetKey) -> OwnedMutexGuard<Option<Dataset>> {
        self.slot(key).lock_owned().await
    }

    /// Returns a copy of the resident dataset for `key`.
    pub async fn get(&self, key: &DatasetKey) -> Option<Dataset> {
        self.lock(key).await.clone()
    }

    /// Returns true if a dataset is resident for `key`.
    pub async fn is_resident(&self, key: &DatasetKey) -> bool {
        self.lock(key).await.is_some()
    }

    /// Returns the number of keys seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no key has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinbars_types::{Bar, Interval};
    use std::time::Duration;

    #[tokio::test]
    async fn test_residency() {
        let registry = DatasetRegistry::new();
        let key = DatasetKey::finest("bitstampUSD");

        assert!(!registry.is_resident(&key).await);
        {
            let mut slot = registry.lock(&key).await;
            let mut dataset = Dataset::new();
            dataset.push(Bar::single(0, 10.0, 1.0)).unwrap();
            *slot = Some(dataset);
        }
        assert!(registry.is_resident(&key).await);
        assert_eq!(registry.get(&key).await.unwrap().len(), 1);

        assert!(registry.lock(&key).await.take().is_some());
        assert!(!registry.is_resident(&key).await);
    }

    #[tokio::test]
    async fn test_keys_share_one_slot() {
        let registry = DatasetRegistry::new();
        let a = registry.slot(&DatasetKey::new("bitstampUSD", Interval::Daily));
        let b = registry.slot(&DatasetKey::new("BITSTAMPUSD", Interval::Daily));
        let c = registry.slot(&DatasetKey::new("BITSTAMPUSD", Interval::Weekly));

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_lock_excludes_other_tasks() {
        let registry = Arc::new(DatasetRegistry::new());
        let key = DatasetKey::finest("bitstampUSD");

        let guard = registry.lock(&key).await;
        let waiter = {
            let registry = Arc::clone(&registry);
            let key = key.clone();
            tokio::spawn(async move { registry.is_resident(&key).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        assert!(!waiter.await.unwrap());
    }
}
