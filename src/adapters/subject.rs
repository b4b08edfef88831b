use crate::domain::model::ResultSet;
use crate::domain::ports::{Callback, ResultSubject, SubscriptionId};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    results: Option<Arc<ResultSet>>,
    observers: Vec<(SubscriptionId, Arc<Callback>)>,
    next_id: u64,
}

/// Shared search results that several views may observe.
///
/// Cloning yields another handle onto the same results and observer list.
#[derive(Clone, Default)]
pub struct SearchResultsObservable {
    inner: Arc<Mutex<Inner>>,
}

impl SearchResultsObservable {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // 觀察者只會排入事件，不會在持有鎖時 panic
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replaces the results and notifies every observer.
    pub fn set_search_results(&self, results: Option<ResultSet>) {
        let observers: Vec<Arc<Callback>> = {
            let mut inner = self.lock();
            inner.results = results.map(Arc::new);
            inner.observers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };

        tracing::debug!("Notifying {} search result observers", observers.len());
        // 在鎖外呼叫，避免觀察者回頭讀取結果時死鎖
        for observer in observers {
            observer();
        }
    }

    pub fn observer_count(&self) -> usize {
        self.lock().observers.len()
    }
}

impl ResultSubject for SearchResultsObservable {
    fn current_results(&self) -> Option<Arc<ResultSet>> {
        self.lock().results.clone()
    }

    fn subscribe(&self, observer: Callback) -> SubscriptionId {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        inner.observers.push((id, Arc::new(observer)));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.lock();
        let before = inner.observers.len();
        inner.observers.retain(|(existing, _)| *existing != id);
        inner.observers.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ResultGroup;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_notifies_each_subscriber() {
        let subject = SearchResultsObservable::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let first = subject.subscribe(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let counter = Arc::clone(&calls);
        subject.subscribe(Box::new(move || {
            counter.fetch_add(10, Ordering::SeqCst);
        }));

        subject.set_search_results(Some(vec![ResultGroup::new("Bars", vec![])]));
        assert_eq!(calls.load(Ordering::SeqCst), 11);

        assert!(subject.unsubscribe(first));
        assert!(!subject.unsubscribe(first));
        subject.set_search_results(None);
        assert_eq!(calls.load(Ordering::SeqCst), 21);
        assert_eq!(subject.observer_count(), 1);
    }

    #[test]
    fn test_observer_can_read_results_during_notification() {
        let subject = SearchResultsObservable::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let reader = subject.clone();
        let groups = Arc::clone(&seen);
        subject.subscribe(Box::new(move || {
            let count = reader.current_results().map(|r| r.len()).unwrap_or(0);
            groups.store(count, Ordering::SeqCst);
        }));

        subject.set_search_results(Some(vec![
            ResultGroup::new("Bars", vec![]),
            ResultGroup::new("Coffee", vec![]),
        ]));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }
}
