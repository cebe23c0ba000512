//! Type Descriptors
//!
//! Read-only metadata describing the interfaces a proxy can implement: the
//! type itself, its methods, their parameters and (for overloaded methods)
//! the declared signatures.
//!
//! Descriptors are built programmatically and handed to a
//! [`LoadingContext`](super::LoadingContext) or straight to the
//! [`ProxyTypeFactory`](super::ProxyTypeFactory).
//!
//! ```rust,ignore
//! let context = TypeSpec::interface("tutorial.IContext")
//!     .method(MethodSpec::new("hasPermission").param(ParameterSpec::new("name").restricted("string")))
//!     .method(MethodSpec::new("getData"));
//! ```

use mockery_sdk::MockValue;

/// Type kind enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Interface (may be proxied)
    Interface,
    /// Concrete class (may not be proxied)
    Class,
}

/// Descriptor of an interface or class
#[derive(Debug, Clone)]
pub struct TypeSpec {
    /// Fully qualified type name
    pub name: String,
    /// Interface or class
    pub kind: TypeKind,
    /// Declared methods, in declaration order
    pub methods: Vec<MethodSpec>,
}

impl TypeSpec {
    /// Describe an interface
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Interface,
            methods: Vec::new(),
        }
    }

    /// Describe a concrete class
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Class,
            methods: Vec::new(),
        }
    }

    /// Add a method
    pub fn method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }

    /// Whether this is an interface
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Look up a declared method by name
    pub fn get_method(&self, name: &str) -> Option<&MethodSpec> {
        self.methods.iter().find(|m| m.name == name)
    }
}

impl AsRef<TypeSpec> for TypeSpec {
    fn as_ref(&self) -> &TypeSpec {
        self
    }
}

/// Descriptor of a single method
#[derive(Debug, Clone)]
pub struct MethodSpec {
    /// Method name
    pub name: String,
    /// Parameters, in order
    pub parameters: Vec<ParameterSpec>,
    /// Overload signatures; `Some` marks the method as overloaded
    pub overloads: Option<Vec<OverloadSignature>>,
}

impl MethodSpec {
    /// Create a method with no parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            overloads: None,
        }
    }

    /// Add a parameter
    pub fn param(mut self, param: ParameterSpec) -> Self {
        self.parameters.push(param);
        self
    }

    /// Declare an overload signature (marks the method as overloaded)
    pub fn overload(mut self, signature: OverloadSignature) -> Self {
        self.overloads.get_or_insert_with(Vec::new).push(signature);
        self
    }

    /// Whether overload signatures were declared
    pub fn is_overloaded(&self) -> bool {
        self.overloads.is_some()
    }

    /// Number of parameters without a default
    pub fn required_parameters(&self) -> usize {
        self.parameters.iter().filter(|p| !p.is_optional()).count()
    }
}

/// One overload variant: the ordered parameter type names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverloadSignature {
    /// Parameter type names
    pub types: Vec<String>,
}

impl OverloadSignature {
    /// Create a signature from type names
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of parameters in this variant
    pub fn arity(&self) -> usize {
        self.types.len()
    }
}

/// Descriptor of a method parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    /// Parameter name
    pub name: String,
    /// Type restriction, if any
    pub restriction: Option<String>,
    /// Default value; a parameter with a default is optional
    pub default: Option<MockValue>,
}

impl ParameterSpec {
    /// Create an unrestricted, required parameter
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            restriction: None,
            default: None,
        }
    }

    /// Restrict the accepted type
    pub fn restricted(mut self, type_name: impl Into<String>) -> Self {
        self.restriction = Some(type_name.into());
        self
    }

    /// Make optional with the given default
    pub fn optional(mut self, default: impl Into<MockValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Whether the parameter may be omitted
    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }
}
