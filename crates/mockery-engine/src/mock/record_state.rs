//! Recording state

use std::sync::Arc;

use mockery_sdk::{InvocationResult, MockValue};

use super::{ExpectationStore, MockState, StateKind};
use crate::reflect::{InvocationHandler, ProxyInstance};

/// Turns every call into a new expectation
#[derive(Debug, Clone)]
pub struct RecordState {
    store: Arc<ExpectationStore>,
}

impl RecordState {
    /// Record into `store`
    pub fn new(store: Arc<ExpectationStore>) -> Self {
        Self { store }
    }

    /// The store being recorded into
    pub fn store(&self) -> &Arc<ExpectationStore> {
        &self.store
    }
}

impl MockState for RecordState {
    fn kind(&self) -> StateKind {
        StateKind::Recording
    }

    fn handle_invocation(&self, method: &str, _args: Vec<MockValue>) -> InvocationResult {
        Ok(self.store.record(method)?.into_value())
    }
}

impl InvocationHandler for RecordState {
    fn handle(&self, _proxy: &ProxyInstance, method: &str, args: Vec<MockValue>) -> InvocationResult {
        self.handle_invocation(method, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MethodOptions;
    use mockery_sdk::{ConstructionError, FromMock, InvocationError};

    #[test]
    fn test_every_call_records() {
        let store = Arc::new(ExpectationStore::new());
        let state = RecordState::new(Arc::clone(&store));

        state.handle_invocation("foo", vec![]).unwrap();
        state.handle_invocation("foo", vec![MockValue::Int(1)]).unwrap();
        assert_eq!(store.remaining("foo"), 2);
        assert_eq!(state.kind(), StateKind::Recording);
    }

    #[test]
    fn test_returned_handle_configures_the_stored_entry() {
        let store = Arc::new(ExpectationStore::new());
        let state = RecordState::new(Arc::clone(&store));

        let value = state.handle_invocation("foo", vec![]).unwrap();
        MethodOptions::from_mock(&value).unwrap().returns("bar");

        assert_eq!(
            store.expectations("foo")[0].return_value(),
            Some(&MockValue::from("bar"))
        );
    }

    #[test]
    fn test_finalized_store_rejects_recording() {
        let store = Arc::new(ExpectationStore::new());
        store.finalize();
        let state = RecordState::new(store);

        assert!(matches!(
            state.handle_invocation("foo", vec![]),
            Err(InvocationError::Construction(ConstructionError::StoreFinalized(_)))
        ));
    }
}
