//! Mockery SDK - value model and error types
//!
//! This crate holds the types that cross the boundary between a proxied method
//! call and whatever handles it, without depending on the engine:
//!
//! - [`MockValue`] / [`ObjectRef`]: dynamically typed arguments and results
//! - [`FromMock`]: typed extraction of results
//! - [`ConstructionError`], [`RaisedError`], [`InvocationError`]: the error
//!   taxonomy shared by the proxy factory and the mock states

#![warn(missing_docs)]

pub mod convert;
pub mod error;
pub mod value;

pub use convert::FromMock;
pub use error::{
    ConstructionError, ConversionError, InvocationError, InvocationResult, RaisedError,
    RegistrationError,
};
pub use value::{MockValue, ObjectRef};
