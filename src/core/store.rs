//! Observable in-memory patient collection
//!
//! The store is the single collection views render from. It is owned by the
//! controller and mutated only after a remote call succeeded; subscribers are
//! notified with the new snapshot after every mutation that changed it.
//!
//! Invariant: at most one record per `id`. The store performs no I/O and
//! knows nothing about the ownership tag.

use crate::domain::{PatientId, PatientRecord};
use std::fmt;

/// Handle returned by [`PatientStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&[PatientRecord]) + Send>;

/// Client-side patient cache
///
/// # Example
///
/// ```
/// use patient_manager::core::store::PatientStore;
/// use patient_manager::domain::{Gender, PatientRecord};
///
/// let mut store = PatientStore::new();
/// let jane = PatientRecord::builder()
///     .id("1").unwrap()
///     .given(["Jane"])
///     .family("Doe")
///     .gender(Gender::Female)
///     .build()
///     .unwrap();
///
/// store.add(jane.clone());
/// store.add(jane);
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Default)]
pub struct PatientStore {
    records: Vec<PatientRecord>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl PatientStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record unless one with the same id is already present
    ///
    /// Returns `true` when the record was inserted. Records without an id are
    /// drafts and are never stored.
    pub fn add(&mut self, record: PatientRecord) -> bool {
        let Some(id) = record.id.as_ref() else {
            tracing::warn!(
                name = %record.name.full_name(),
                "Ignoring patient without id"
            );
            return false;
        };

        if self.position(id).is_some() {
            tracing::debug!(patient_id = %id, "Patient already in store, skipping");
            return false;
        }

        self.records.push(record);
        self.notify();
        true
    }

    /// Replace the record with the same id
    ///
    /// A missing match is a no-op: the store cannot tell a stale reference
    /// from a genuine absence. Returns `true` when a record was replaced.
    pub fn update_record(&mut self, record: PatientRecord) -> bool {
        let Some(index) = record.id.as_ref().and_then(|id| self.position(id)) else {
            tracing::debug!(patient_id = ?record.id, "No patient to update in store");
            return false;
        };

        self.records[index] = record;
        self.notify();
        true
    }

    /// Remove the record with this id, no-op if absent
    ///
    /// Returns `true` when a record was removed.
    pub fn remove_record(&mut self, id: &PatientId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };

        self.records.remove(index);
        self.notify();
        true
    }

    /// Current snapshot, in store-internal order
    pub fn list(&self) -> &[PatientRecord] {
        &self.records
    }

    /// Look up a record by id
    pub fn get(&self, id: &PatientId) -> Option<&PatientRecord> {
        self.position(id).map(|i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record
    pub fn clear(&mut self) {
        if self.records.is_empty() {
            return;
        }
        self.records.clear();
        self.notify();
    }

    /// Register a callback invoked with the new snapshot after each change
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&[PatientRecord]) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription; returns `false` if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn position(&self, id: &PatientId) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.id.as_ref() == Some(id))
    }

    fn notify(&self) {
        for (_, subscriber) in &self.subscribers {
            subscriber(&self.records);
        }
    }
}

impl fmt::Debug for PatientStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatientStore")
            .field("records", &self.records)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Gender;
    use fake::faker::name::en::{FirstName, LastName};
    use fake::Fake;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn patient(id: &str, given: &str, family: &str) -> PatientRecord {
        PatientRecord::builder()
            .id(id)
            .unwrap()
            .given([given])
            .family(family)
            .gender(Gender::Female)
            .build()
            .unwrap()
    }

    fn pid(id: &str) -> PatientId {
        PatientId::new(id).unwrap()
    }

    #[test]
    fn test_add_then_list() {
        let mut store = PatientStore::new();
        assert!(store.add(patient("1", "Jane", "Doe")));

        let list = store.list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, Some(pid("1")));
    }

    #[test]
    fn test_duplicate_add_keeps_first() {
        let mut store = PatientStore::new();
        store.add(patient("1", "Jane", "Doe"));
        assert!(!store.add(patient("1", "Jane", "Smith")));

        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].name.family, "Doe");
    }

    #[test]
    fn test_duplicate_add_with_generated_names() {
        for _ in 0..20 {
            let first = patient("dup", &FirstName().fake::<String>(), &LastName().fake::<String>());
            let second = patient("dup", &FirstName().fake::<String>(), &LastName().fake::<String>());

            let mut store = PatientStore::new();
            store.add(first.clone());
            store.add(second);

            assert_eq!(store.list(), &[first]);
        }
    }

    #[test]
    fn test_add_without_id_is_ignored() {
        let mut store = PatientStore::new();
        let draft = PatientRecord::builder().family("Doe").build().unwrap();
        assert!(!store.add(draft));
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_record_replaces_match() {
        let mut store = PatientStore::new();
        store.add(patient("1", "Jane", "Doe"));
        store.add(patient("2", "Jan", "Smith"));

        assert!(store.update_record(patient("2", "Jan", "Smythe")));
        assert_eq!(store.get(&pid("2")).unwrap().name.family, "Smythe");
        assert_eq!(store.get(&pid("1")).unwrap().name.family, "Doe");
    }

    #[test]
    fn test_update_record_missing_is_noop() {
        let mut store = PatientStore::new();
        store.add(patient("1", "Jane", "Doe"));
        let before = store.list().to_vec();

        assert!(!store.update_record(patient("9", "Ghost", "Record")));
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn test_remove_record() {
        let mut store = PatientStore::new();
        store.add(patient("1", "Jane", "Doe"));
        store.add(patient("2", "Jan", "Smith"));

        assert!(store.remove_record(&pid("1")));
        assert_eq!(store.len(), 1);
        assert!(store.get(&pid("1")).is_none());
    }

    #[test]
    fn test_remove_record_missing_is_noop() {
        let mut store = PatientStore::new();
        store.add(patient("1", "Jane", "Doe"));
        let before = store.list().to_vec();

        assert!(!store.remove_record(&pid("404")));
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn test_subscribers_fire_on_changes_only() {
        let mut store = PatientStore::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        store.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        store.add(patient("1", "Jane", "Doe"));
        store.add(patient("1", "Jane", "Doe"));
        store.update_record(patient("2", "No", "One"));
        store.remove_record(&pid("2"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        store.update_record(patient("1", "Jane", "Dough"));
        store.remove_record(&pid("1"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_subscriber_receives_snapshot() {
        let mut store = PatientStore::new();
        let last_len = Arc::new(AtomicUsize::new(usize::MAX));
        let sink = last_len.clone();
        store.subscribe(move |records| sink.store(records.len(), Ordering::SeqCst));

        store.add(patient("1", "Jane", "Doe"));
        store.add(patient("2", "Jan", "Smith"));
        assert_eq!(last_len.load(Ordering::SeqCst), 2);

        store.clear();
        assert_eq!(last_len.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = PatientStore::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let id = store.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));

        store.add(patient("1", "Jane", "Doe"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
