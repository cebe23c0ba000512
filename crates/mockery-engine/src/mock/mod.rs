//! Record/Replay Mocking
//!
//! A mock is a proxy instance whose handler is one of two states sharing one
//! [`ExpectationStore`]:
//!
//! | State | Behavior of every call |
//! |-------|------------------------|
//! | [`RecordState`] | appends an empty expectation, returns its [`MethodOptions`] |
//! | [`ReplayState`] | consumes the method's next expectation in FIFO order |
//!
//! [`Mockery`] creates mocks in the recording state and swaps them all to
//! replaying with [`Mockery::replay_all`].

mod expectation;
mod mockery;
mod record_state;
mod replay_state;
mod store;

pub use expectation::{
    Expectation, ExpectationList, ExpectationOutcome, MethodOptions, SharedExpectation,
    METHOD_OPTIONS_CLASS,
};
pub use mockery::Mockery;
pub use record_state::RecordState;
pub use replay_state::ReplayState;
pub use store::{ExpectationStore, NextExpectation, UnexpectedCall, VerificationError};

use mockery_sdk::{InvocationResult, MockValue};

use crate::reflect::InvocationHandler;

/// Which phase a mock is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    /// Calls record expectations
    Recording,
    /// Calls consume expectations
    Replaying,
}

/// A mock's current behavior, installed on its proxy as the handler
pub trait MockState: InvocationHandler {
    /// Which phase this state implements
    fn kind(&self) -> StateKind;

    /// Process one call of `method`
    fn handle_invocation(&self, method: &str, args: Vec<MockValue>) -> InvocationResult;
}
