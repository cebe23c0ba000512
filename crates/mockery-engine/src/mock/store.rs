//! Expectation Store
//!
//! Per-method FIFO ledgers of expectations plus the log of unexpected calls.
//! Recording writes into the store; replaying pops from it and files calls
//! that arrive after a method's ledger ran dry.
//!
//! The store is confined to one fixture. It is shared through `Arc` between the
//! recording and replaying states, and the internal mutex only exists to make
//! that sharing safe.

use std::fmt;

use mockery_sdk::{ConstructionError, MockValue};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{trace, warn};

use super::expectation::{Expectation, ExpectationList, MethodOptions};

/// A replayed call for a method whose expectations were already consumed
#[derive(Debug, Clone, PartialEq)]
pub struct UnexpectedCall {
    /// Method name
    pub method: String,
    /// Arguments the call was made with
    pub arguments: Vec<MockValue>,
}

impl fmt::Display for UnexpectedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.method)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

/// Result of asking the store for a method's next expectation
#[derive(Debug, Clone, PartialEq)]
pub enum NextExpectation {
    /// The method was never recorded
    NotRecorded,
    /// The method was recorded but every expectation was consumed
    Exhausted,
    /// The next expectation, now consumed
    Ready(Expectation),
}

/// Failure reported by the verification step
#[derive(Debug, Clone, Default, PartialEq, thiserror::Error)]
#[error("{} unexpected call(s), {} method(s) with unconsumed expectations", .unexpected.len(), .pending.len())]
pub struct VerificationError {
    /// Calls made after their method's expectations ran out
    pub unexpected: Vec<UnexpectedCall>,
    /// `(method, remaining)` for every method with expectations left
    pub pending: Vec<(String, usize)>,
}

impl VerificationError {
    /// Whether nothing was reported
    pub fn is_empty(&self) -> bool {
        self.unexpected.is_empty() && self.pending.is_empty()
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: VerificationError) {
        self.unexpected.extend(other.unexpected);
        self.pending.extend(other.pending);
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    lists: FxHashMap<String, ExpectationList>,
    unexpected: Vec<UnexpectedCall>,
    finalized: bool,
}

/// Method name → expectation ledger, plus the unexpected-call log
#[derive(Debug)]
pub struct ExpectationStore {
    inner: Mutex<StoreInner>,
    warn_unexpected: bool,
}

impl Default for ExpectationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpectationStore {
    /// Create an empty store that warns on unexpected calls
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
            warn_unexpected: true,
        }
    }

    /// Toggle the warning emitted when an unexpected call is filed
    pub fn with_unexpected_warnings(mut self, enabled: bool) -> Self {
        self.warn_unexpected = enabled;
        self
    }

    /// Append an empty expectation for `method` and return its handle
    pub fn record(&self, method: &str) -> Result<MethodOptions, ConstructionError> {
        let mut inner = self.inner.lock();
        if inner.finalized {
            return Err(ConstructionError::StoreFinalized(method.to_string()));
        }

        let list = inner.lists.entry(method.to_string()).or_default();
        let entry = list.push_new();
        trace!(method, position = list.len(), "recorded expectation");
        Ok(MethodOptions::new(method, entry))
    }

    /// Consume the next expectation for `method`
    pub fn next_expectation(&self, method: &str, args: &[MockValue]) -> NextExpectation {
        let mut inner = self.inner.lock();
        match inner.lists.get_mut(method) {
            None => NextExpectation::NotRecorded,
            Some(list) => match list.get_next(args) {
                Some(expectation) => NextExpectation::Ready(expectation),
                None => NextExpectation::Exhausted,
            },
        }
    }

    /// Log an unexpected call
    pub fn file_unexpected(&self, method: &str, args: Vec<MockValue>) {
        let call = UnexpectedCall {
            method: method.to_string(),
            arguments: args,
        };
        if self.warn_unexpected {
            warn!(call = %call, "unexpected call, expectations exhausted");
        }
        self.inner.lock().unexpected.push(call);
    }

    /// Snapshot of the unexpected-call log
    pub fn unexpected_calls(&self) -> Vec<UnexpectedCall> {
        self.inner.lock().unexpected.clone()
    }

    /// Stop accepting recordings; required before replaying
    pub fn finalize(&self) {
        self.inner.lock().finalized = true;
    }

    /// Whether recording is complete
    pub fn is_finalized(&self) -> bool {
        self.inner.lock().finalized
    }

    /// Whether `method` was ever recorded
    pub fn contains_method(&self, method: &str) -> bool {
        self.inner.lock().lists.contains_key(method)
    }

    /// Number of recorded methods
    pub fn method_count(&self) -> usize {
        self.inner.lock().lists.len()
    }

    /// Unconsumed expectations for `method`
    pub fn remaining(&self, method: &str) -> usize {
        self.inner.lock().lists.get(method).map_or(0, ExpectationList::len)
    }

    /// Snapshot of the unconsumed expectations for `method`
    pub fn expectations(&self, method: &str) -> Vec<Expectation> {
        let inner = self.inner.lock();
        let Some(list) = inner.lists.get(method) else {
            return Vec::new();
        };
        (0..list.len()).filter_map(|i| list.get(i)).collect()
    }

    /// `(method, remaining)` for methods with unconsumed expectations, sorted by name
    pub fn pending(&self) -> Vec<(String, usize)> {
        let inner = self.inner.lock();
        let mut pending: Vec<(String, usize)> = inner
            .lists
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(method, list)| (method.clone(), list.len()))
            .collect();
        pending.sort();
        pending
    }

    /// Check that no unexpected calls occurred and every expectation was consumed
    pub fn verify(&self) -> Result<(), VerificationError> {
        let report = VerificationError {
            unexpected: self.unexpected_calls(),
            pending: self.pending(),
        };
        if report.is_empty() {
            Ok(())
        } else {
            Err(report)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creates_list_per_method() {
        let store = ExpectationStore::new();
        store.record("foo").unwrap();
        store.record("foo").unwrap();
        store.record("bar").unwrap();

        assert_eq!(store.method_count(), 2);
        assert_eq!(store.remaining("foo"), 2);
        assert_eq!(store.remaining("bar"), 1);
        assert_eq!(store.expectations("foo"), vec![Expectation::new(), Expectation::new()]);
    }

    #[test]
    fn test_record_after_finalize_fails() {
        let store = ExpectationStore::new();
        store.finalize();
        assert_eq!(
            store.record("foo").map(|_| ()),
            Err(ConstructionError::StoreFinalized("foo".to_string()))
        );
    }

    #[test]
    fn test_next_expectation_states() {
        let store = ExpectationStore::new();
        store.record("foo").unwrap().returns(1);

        assert_eq!(store.next_expectation("baz", &[]), NextExpectation::NotRecorded);
        assert!(matches!(store.next_expectation("foo", &[]), NextExpectation::Ready(_)));
        assert_eq!(store.next_expectation("foo", &[]), NextExpectation::Exhausted);
        assert!(store.contains_method("foo"));
    }

    #[test]
    fn test_unexpected_log() {
        let store = ExpectationStore::new().with_unexpected_warnings(false);
        store.file_unexpected("foo", vec![MockValue::Int(3)]);

        let calls = store.unexpected_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].to_string(), "foo(3)");
    }

    #[test]
    fn test_verify_reports_everything() {
        let store = ExpectationStore::new();
        store.record("b").unwrap();
        store.record("a").unwrap();
        store.record("a").unwrap();
        store.file_unexpected("c", vec![]);

        let report = store.verify().unwrap_err();
        assert_eq!(report.pending, vec![("a".to_string(), 2), ("b".to_string(), 1)]);
        assert_eq!(report.unexpected.len(), 1);
        assert_eq!(
            report.to_string(),
            "1 unexpected call(s), 2 method(s) with unconsumed expectations"
        );
    }

    #[test]
    fn test_verify_clean_store() {
        let store = ExpectationStore::new();
        store.record("foo").unwrap();
        store.next_expectation("foo", &[]);
        assert_eq!(store.verify(), Ok(()));
    }
}
