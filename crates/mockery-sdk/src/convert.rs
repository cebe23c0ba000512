//! Typed extraction of `MockValue`s.
//!
//! Implement `FromMock` to let callers receive a proxied method's result as a
//! Rust type instead of a raw `MockValue`.
//!
//! # Example
//!
//! ```ignore
//! let granted: bool = context.call("hasPermission", vec!["rt=foo".into()])?;
//! ```

use crate::error::ConversionError;
use crate::value::MockValue;

/// Convert from a `MockValue` to a Rust type.
pub trait FromMock: Sized {
    /// Convert, returning an error if the value has the wrong type
    fn from_mock(value: &MockValue) -> Result<Self, ConversionError>;
}

impl FromMock for MockValue {
    fn from_mock(value: &MockValue) -> Result<Self, ConversionError> {
        Ok(value.clone())
    }
}

impl FromMock for () {
    fn from_mock(value: &MockValue) -> Result<Self, ConversionError> {
        if value.is_null() {
            Ok(())
        } else {
            Err(ConversionError::mismatch("null", value))
        }
    }
}

impl FromMock for bool {
    fn from_mock(value: &MockValue) -> Result<Self, ConversionError> {
        value.as_bool().ok_or_else(|| ConversionError::mismatch("bool", value))
    }
}

impl FromMock for i64 {
    fn from_mock(value: &MockValue) -> Result<Self, ConversionError> {
        value.as_int().ok_or_else(|| ConversionError::mismatch("int", value))
    }
}

impl FromMock for i32 {
    fn from_mock(value: &MockValue) -> Result<Self, ConversionError> {
        value
            .as_int()
            .and_then(|i| i32::try_from(i).ok())
            .ok_or_else(|| ConversionError::mismatch("int", value))
    }
}

impl FromMock for f64 {
    fn from_mock(value: &MockValue) -> Result<Self, ConversionError> {
        value.as_float().ok_or_else(|| ConversionError::mismatch("float", value))
    }
}

impl FromMock for String {
    fn from_mock(value: &MockValue) -> Result<Self, ConversionError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ConversionError::mismatch("string", value))
    }
}

impl FromMock for Vec<MockValue> {
    fn from_mock(value: &MockValue) -> Result<Self, ConversionError> {
        value
            .as_array()
            .map(<[MockValue]>::to_vec)
            .ok_or_else(|| ConversionError::mismatch("array", value))
    }
}

// Null maps to None
impl<T: FromMock> FromMock for Option<T> {
    fn from_mock(value: &MockValue) -> Result<Self, ConversionError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_mock(value).map(Some)
        }
    }
}
