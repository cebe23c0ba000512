//! Error types shared across the Mockery crates
//!
//! Two tiers are kept apart:
//! - [`ConstructionError`]: the test author misused the API (bad interface set,
//!   wrong arity, invalid store). Fatal at the call site.
//! - [`RaisedError`]: a failure deliberately configured on an expectation and
//!   raised when that expectation is replayed.
//!
//! Both reach a caller of a proxied method through [`InvocationError`].

use crate::value::MockValue;

/// Result type for proxied invocations
pub type InvocationResult = Result<MockValue, InvocationError>;

/// Failure while registering a synthesized type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// Empty type name
    #[error("Type name may not be empty")]
    EmptyName,

    /// A type with this name is already registered
    #[error("Type {0} is already defined")]
    DuplicateName(String),

    /// A method name is not a valid identifier
    #[error("Malformed method name '{method}' in {type_name}")]
    MalformedMethod {
        /// Type being registered
        type_name: String,
        /// Offending method name
        method: String,
    },
}

/// API misuse detected while building proxies, dispatching calls or
/// switching mock states.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConstructionError {
    /// No interfaces supplied
    #[error("Interfaces may not be empty")]
    EmptyInterfaces,

    /// A concrete type was supplied where an interface is required
    #[error("{0} is not an interface")]
    NotAnInterface(String),

    /// No declared signature accepts the supplied number of arguments
    #[error("Illegal number of arguments: {method}() accepts {expected}, {got} given")]
    IllegalArgumentCount {
        /// Method name
        method: String,
        /// Accepted arities, rendered (e.g. "0 or 2")
        expected: String,
        /// Number of arguments supplied
        got: usize,
    },

    /// An argument does not satisfy its parameter's type restriction
    #[error("Argument {position} passed to {method}() must be {expected}, {got} given")]
    TypeRestriction {
        /// Method name
        method: String,
        /// 1-based argument position
        position: usize,
        /// Declared restriction
        expected: String,
        /// Type name of the supplied value
        got: String,
    },

    /// The proxy's dispatch table has no such method
    #[error("Call to undefined method {type_name}::{method}()")]
    UndefinedMethod {
        /// Proxy type name
        type_name: String,
        /// Requested method
        method: String,
    },

    /// A loading context could not resolve a type name
    #[error("Class {0} not found")]
    ClassNotFound(String),

    /// A replaying state was given a store it cannot replay
    #[error("Invalid expectation map passed: {0}")]
    InvalidExpectationStore(String),

    /// An expectation was recorded after the store was finalized
    #[error("Cannot record {0}(): expectations are already being replayed")]
    StoreFinalized(String),

    /// The synthesized type could not be registered
    #[error("Cannot define proxy type {name}: {source}")]
    Registration {
        /// Synthesized type name
        name: String,
        /// Underlying registration failure
        #[source]
        source: RegistrationError,
    },
}

/// A failure recorded on an expectation and raised when it is replayed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct RaisedError {
    /// Error class (e.g. "lang.IllegalAccessException")
    pub kind: String,
    /// Human-readable message
    pub message: String,
}

impl RaisedError {
    /// Create a new raised error
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// A returned value could not be converted to the requested Rust type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Type mismatch during conversion
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type name
        expected: String,
        /// Actual type name
        got: String,
    },
}

impl ConversionError {
    /// Build a mismatch error for `value`
    pub fn mismatch(expected: &str, value: &MockValue) -> Self {
        ConversionError::TypeMismatch {
            expected: expected.to_string(),
            got: value.type_name().to_string(),
        }
    }
}

/// Everything a proxied method call can fail with
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvocationError {
    /// API misuse (wrong arity, undefined method, ...)
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    /// A recorded failure being replayed
    #[error(transparent)]
    Raised(#[from] RaisedError),

    /// The result could not be converted to the requested type
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl InvocationError {
    /// The recorded failure, if this is one
    pub fn as_raised(&self) -> Option<&RaisedError> {
        match self {
            InvocationError::Raised(e) => Some(e),
            _ => None,
        }
    }

    /// The construction error, if this is one
    pub fn as_construction(&self) -> Option<&ConstructionError> {
        match self {
            InvocationError::Construction(e) => Some(e),
            _ => None,
        }
    }
}
