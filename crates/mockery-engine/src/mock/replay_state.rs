//! Replaying state

use std::sync::Arc;

use mockery_sdk::{ConstructionError, InvocationResult, MockValue};

use super::{ExpectationStore, MockState, NextExpectation, StateKind};
use crate::reflect::{InvocationHandler, ProxyInstance};

/// Answers calls from recorded expectations, in recording order per method
#[derive(Debug, Clone)]
pub struct ReplayState {
    store: Arc<ExpectationStore>,
}

impl ReplayState {
    /// Replay from `store`, which must have finished recording
    pub fn new(store: Arc<ExpectationStore>) -> Result<Self, ConstructionError> {
        if !store.is_finalized() {
            return Err(ConstructionError::InvalidExpectationStore(
                "recording has not been finalized".to_string(),
            ));
        }
        Ok(Self { store })
    }

    /// The store being replayed
    pub fn store(&self) -> &Arc<ExpectationStore> {
        &self.store
    }
}

impl MockState for ReplayState {
    fn kind(&self) -> StateKind {
        StateKind::Replaying
    }

    fn handle_invocation(&self, method: &str, args: Vec<MockValue>) -> InvocationResult {
        match self.store.next_expectation(method, &args) {
            NextExpectation::Ready(expectation) => expectation.into_result(),
            NextExpectation::Exhausted => {
                self.store.file_unexpected(method, args);
                Ok(MockValue::Null)
            }
            NextExpectation::NotRecorded => Ok(MockValue::Null),
        }
    }
}

impl InvocationHandler for ReplayState {
    fn handle(&self, _proxy: &ProxyInstance, method: &str, args: Vec<MockValue>) -> InvocationResult {
        self.handle_invocation(method, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockery_sdk::{InvocationError, RaisedError};

    fn finalized(store: ExpectationStore) -> Arc<ExpectationStore> {
        store.finalize();
        Arc::new(store)
    }

    #[test]
    fn test_requires_finalized_store() {
        let err = ReplayState::new(Arc::new(ExpectationStore::new())).unwrap_err();
        assert!(matches!(err, ConstructionError::InvalidExpectationStore(_)));
    }

    #[test]
    fn test_replays_then_logs_unexpected() {
        let store = ExpectationStore::new().with_unexpected_warnings(false);
        store.record("foo").unwrap().returns(42);
        let state = ReplayState::new(finalized(store)).unwrap();

        assert_eq!(state.handle_invocation("foo", vec![]), Ok(MockValue::Int(42)));
        assert_eq!(state.handle_invocation("foo", vec![]), Ok(MockValue::Null));

        let calls = state.store().unexpected_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "foo");
        assert!(calls[0].arguments.is_empty());
    }

    #[test]
    fn test_fifo_with_raise() {
        let store = ExpectationStore::new();
        store.record("foo").unwrap().returns(1);
        let error = RaisedError::new("E", "second");
        store.record("foo").unwrap().throws(error.clone());
        let state = ReplayState::new(finalized(store)).unwrap();

        assert_eq!(state.handle_invocation("foo", vec![]), Ok(MockValue::Int(1)));
        assert_eq!(
            state.handle_invocation("foo", vec![]),
            Err(InvocationError::Raised(error))
        );
    }

    #[test]
    fn test_unknown_method_is_silent() {
        let state = ReplayState::new(finalized(ExpectationStore::new())).unwrap();
        assert_eq!(state.handle_invocation("baz", vec![]), Ok(MockValue::Null));
        assert!(state.store().unexpected_calls().is_empty());
        assert_eq!(state.kind(), StateKind::Replaying);
    }

    #[test]
    fn test_methods_are_independent() {
        let store = ExpectationStore::new();
        store.record("foo").unwrap().returns("f");
        store.record("bar").unwrap().returns("b");
        let state = ReplayState::new(finalized(store)).unwrap();

        assert_eq!(state.handle_invocation("bar", vec![]), Ok(MockValue::from("b")));
        assert_eq!(state.handle_invocation("foo", vec![]), Ok(MockValue::from("f")));
    }
}
