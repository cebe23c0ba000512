//! Expectations and their configuration handles
//!
//! An [`Expectation`] is created empty when a call is recorded and configured
//! afterwards through the [`MethodOptions`] handle the recording call returned.
//! The store and the handle share the same entry, so configuring the handle
//! changes what will be replayed.

use std::collections::VecDeque;
use std::sync::Arc;

use mockery_sdk::{ConversionError, FromMock, InvocationResult, MockValue, ObjectRef, RaisedError};
use parking_lot::Mutex;

/// Class name `MethodOptions` handles carry as object values
pub const METHOD_OPTIONS_CLASS: &str = "MethodOptions";

/// What a replayed call produces
#[derive(Debug, Clone, PartialEq)]
pub enum ExpectationOutcome {
    /// Return a value
    Return(MockValue),
    /// Raise an error
    Raise(RaisedError),
}

/// One recorded call outcome
#[derive(Debug, Clone, PartialEq)]
pub struct Expectation {
    outcome: ExpectationOutcome,
}

impl Default for Expectation {
    fn default() -> Self {
        Self {
            outcome: ExpectationOutcome::Return(MockValue::Null),
        }
    }
}

impl Expectation {
    /// Create an empty expectation (returns null)
    pub fn new() -> Self {
        Self::default()
    }

    /// The configured outcome
    pub fn outcome(&self) -> &ExpectationOutcome {
        &self.outcome
    }

    /// The return value, unless an error is configured
    pub fn return_value(&self) -> Option<&MockValue> {
        match &self.outcome {
            ExpectationOutcome::Return(value) => Some(value),
            ExpectationOutcome::Raise(_) => None,
        }
    }

    /// The configured error, if any
    pub fn exception(&self) -> Option<&RaisedError> {
        match &self.outcome {
            ExpectationOutcome::Raise(error) => Some(error),
            ExpectationOutcome::Return(_) => None,
        }
    }

    /// Return `value` when replayed (replaces any configured error)
    pub fn set_return(&mut self, value: MockValue) {
        self.outcome = ExpectationOutcome::Return(value);
    }

    /// Raise `error` when replayed (replaces any configured value)
    pub fn set_exception(&mut self, error: RaisedError) {
        self.outcome = ExpectationOutcome::Raise(error);
    }

    /// Produce the replayed result
    pub fn into_result(self) -> InvocationResult {
        match self.outcome {
            ExpectationOutcome::Return(value) => Ok(value),
            ExpectationOutcome::Raise(error) => Err(error.into()),
        }
    }
}

/// An expectation shared between its store and configuration handles
pub type SharedExpectation = Arc<Mutex<Expectation>>;

/// FIFO of expectations recorded for one method
#[derive(Debug, Default)]
pub struct ExpectationList {
    entries: VecDeque<SharedExpectation>,
}

impl ExpectationList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new empty expectation and return the shared entry
    pub fn push_new(&mut self) -> SharedExpectation {
        let entry = Arc::new(Mutex::new(Expectation::new()));
        self.entries.push_back(Arc::clone(&entry));
        entry
    }

    /// Pop the head expectation. Arguments are accepted but never inspected.
    pub fn get_next(&mut self, _args: &[MockValue]) -> Option<Expectation> {
        self.entries.pop_front().map(|entry| entry.lock().clone())
    }

    /// Snapshot of the expectation at `index`
    pub fn get(&self, index: usize) -> Option<Expectation> {
        self.entries.get(index).map(|entry| entry.lock().clone())
    }

    /// Number of unconsumed expectations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if all expectations were consumed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Handle returned by a recording call; configures exactly one expectation
#[derive(Debug, Clone)]
pub struct MethodOptions {
    method: String,
    expectation: SharedExpectation,
}

impl MethodOptions {
    pub(crate) fn new(method: impl Into<String>, expectation: SharedExpectation) -> Self {
        Self {
            method: method.into(),
            expectation,
        }
    }

    /// Method the expectation was recorded for
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Make the expectation return `value`
    pub fn returns(&self, value: impl Into<MockValue>) -> &Self {
        self.expectation.lock().set_return(value.into());
        self
    }

    /// Make the expectation raise `error`
    pub fn throws(&self, error: RaisedError) -> &Self {
        self.expectation.lock().set_exception(error);
        self
    }

    /// Snapshot of the configured expectation
    pub fn expectation(&self) -> Expectation {
        self.expectation.lock().clone()
    }

    /// Wrap as an object value (what a recording proxy call returns)
    pub fn into_value(self) -> MockValue {
        MockValue::Object(ObjectRef::new(METHOD_OPTIONS_CLASS, self))
    }
}

impl FromMock for MethodOptions {
    fn from_mock(value: &MockValue) -> Result<Self, ConversionError> {
        value
            .as_object()
            .and_then(|object| object.downcast_ref::<MethodOptions>())
            .cloned()
            .ok_or_else(|| ConversionError::mismatch(METHOD_OPTIONS_CLASS, value))
    }
}
