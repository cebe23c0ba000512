//! Dynamically typed values carried through proxies
//!
//! Arguments, return values and recorded outcomes all travel as `MockValue`.
//! Objects are shared, type-erased references, so a mock can hand back another
//! mock (or an expectation handle) through the same channel as a plain integer.
//!
//! # Rendering
//!
//! `Display` renders values the way they appear in a method signature:
//!
//! ```text
//! null          NULL
//! bool          TRUE / FALSE
//! int           42
//! float         2.5
//! string        'text'   (quotes and backslashes escaped)
//! array         array(1, 'a')
//! object        <ClassName>
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// ObjectRef
// ============================================================================

/// Shared reference to an arbitrary object value.
///
/// Equality is identity: two `ObjectRef`s are equal only if they point at the
/// same allocation.
#[derive(Clone)]
pub struct ObjectRef {
    class_name: String,
    interfaces: Vec<String>,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ObjectRef {
    /// Wrap a value under the given class name
    pub fn new<T: Any + Send + Sync>(class_name: impl Into<String>, value: T) -> Self {
        Self::from_arc(class_name, Arc::new(value))
    }

    /// Wrap an already shared value
    pub fn from_arc<T: Any + Send + Sync>(class_name: impl Into<String>, value: Arc<T>) -> Self {
        Self {
            class_name: class_name.into(),
            interfaces: Vec::new(),
            inner: value,
        }
    }

    /// Declare the interfaces this object implements (used by type restrictions)
    pub fn with_interfaces<I, S>(mut self, interfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interfaces.extend(interfaces.into_iter().map(Into::into));
        self
    }

    /// Concrete class name
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Declared interfaces
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    /// Whether the object is of class `name` or implements interface `name`
    pub fn is_instance_of(&self, name: &str) -> bool {
        self.class_name == name || self.interfaces.iter().any(|i| i == name)
    }

    /// Borrow the wrapped value if it is a `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Get a shared handle to the wrapped value if it is a `T`
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef<{}>({:p})", self.class_name, Arc::as_ptr(&self.inner))
    }
}

// ============================================================================
// MockValue
// ============================================================================

/// A dynamically typed value passed to or returned from a proxied method.
#[derive(Clone, Default, PartialEq)]
pub enum MockValue {
    /// Absence of a value (also the "void" result)
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// String
    Str(String),
    /// Ordered list of values
    Array(Vec<MockValue>),
    /// Shared object reference
    Object(ObjectRef),
}

impl MockValue {
    /// Wrap any object
    pub fn object<T: Any + Send + Sync>(class_name: impl Into<String>, value: T) -> Self {
        MockValue::Object(ObjectRef::new(class_name, value))
    }

    /// Check if this is null
    pub fn is_null(&self) -> bool {
        matches!(self, MockValue::Null)
    }

    /// Get as bool if this is a bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MockValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an int
    pub fn as_int(&self) -> Option<i64> {
        match self {
            MockValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a float (ints widen)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            MockValue::Float(f) => Some(*f),
            MockValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get as string slice if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MockValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as slice if this is an array
    pub fn as_array(&self) -> Option<&[MockValue]> {
        match self {
            MockValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get the object reference if this is an object
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            MockValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Name of the value's type; objects report their class name
    pub fn type_name(&self) -> &str {
        match self {
            MockValue::Null => "null",
            MockValue::Bool(_) => "bool",
            MockValue::Int(_) => "int",
            MockValue::Float(_) => "float",
            MockValue::Str(_) => "string",
            MockValue::Array(_) => "array",
            MockValue::Object(obj) => obj.class_name(),
        }
    }

    /// Whether this value satisfies a parameter type restriction.
    ///
    /// Primitive restrictions accept their usual aliases, `var`/`mixed` accept
    /// anything, and any other name is matched against the object's class and
    /// interfaces. `null` never satisfies a restriction by itself.
    pub fn satisfies(&self, restriction: &str) -> bool {
        match restriction {
            "var" | "mixed" => return true,
            "float" | "double" => return matches!(self, MockValue::Float(_) | MockValue::Int(_)),
            _ => {}
        }
        match self {
            MockValue::Null => false,
            MockValue::Bool(_) => matches!(restriction, "bool" | "boolean"),
            MockValue::Int(_) => matches!(restriction, "int" | "integer"),
            MockValue::Float(_) => false,
            MockValue::Str(_) => restriction == "string",
            MockValue::Array(_) => restriction == "array",
            MockValue::Object(obj) => restriction == "object" || obj.is_instance_of(restriction),
        }
    }
}

impl fmt::Debug for MockValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MockValue::Null => write!(f, "Null"),
            MockValue::Bool(b) => write!(f, "Bool({})", b),
            MockValue::Int(i) => write!(f, "Int({})", i),
            MockValue::Float(x) => write!(f, "Float({})", x),
            MockValue::Str(s) => write!(f, "Str({:?})", s),
            MockValue::Array(items) => f.debug_list().entries(items).finish(),
            MockValue::Object(obj) => write!(f, "{:?}", obj),
        }
    }
}

impl fmt::Display for MockValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MockValue::Null => write!(f, "NULL"),
            MockValue::Bool(true) => write!(f, "TRUE"),
            MockValue::Bool(false) => write!(f, "FALSE"),
            MockValue::Int(i) => write!(f, "{}", i),
            MockValue::Float(x) => write!(f, "{:?}", x),
            MockValue::Str(s) => {
                write!(f, "'")?;
                for c in s.chars() {
                    if c == '\'' || c == '\\' {
                        write!(f, "\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                write!(f, "'")
            }
            MockValue::Array(items) => {
                write!(f, "array(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            MockValue::Object(obj) => write!(f, "<{}>", obj.class_name()),
        }
    }
}

// ============================================================================
// Conversions into MockValue
// ============================================================================

impl From<()> for MockValue {
    fn from(_: ()) -> Self {
        MockValue::Null
    }
}

impl From<bool> for MockValue {
    fn from(b: bool) -> Self {
        MockValue::Bool(b)
    }
}

impl From<i32> for MockValue {
    fn from(i: i32) -> Self {
        MockValue::Int(i as i64)
    }
}

impl From<i64> for MockValue {
    fn from(i: i64) -> Self {
        MockValue::Int(i)
    }
}

impl From<f64> for MockValue {
    fn from(f: f64) -> Self {
        MockValue::Float(f)
    }
}

impl From<&str> for MockValue {
    fn from(s: &str) -> Self {
        MockValue::Str(s.to_string())
    }
}

impl From<String> for MockValue {
    fn from(s: String) -> Self {
        MockValue::Str(s)
    }
}

impl From<Vec<MockValue>> for MockValue {
    fn from(items: Vec<MockValue>) -> Self {
        MockValue::Array(items)
    }
}

impl From<ObjectRef> for MockValue {
    fn from(obj: ObjectRef) -> Self {
        MockValue::Object(obj)
    }
}

impl<T: Into<MockValue>> From<Option<T>> for MockValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(MockValue::Null, Into::into)
    }
}
