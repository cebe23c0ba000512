//! Proxy Type Builder
//!
//! Turns interface descriptors into a dispatch table: one [`MethodSlot`] per
//! unique method name, each holding the forwarding stub that binds the
//! arguments of a call before they reach the invocation handler.
//!
//! ## Stubs
//!
//! | Kind         | Built from                | Call-time behavior                        |
//! |--------------|---------------------------|-------------------------------------------|
//! | `Fixed`      | the parameter list        | positional binding, defaults, type checks |
//! | `Overloaded` | the overload signatures   | switch on the number of arguments         |
//!
//! Methods are merged across interfaces in the order supplied; when two
//! interfaces declare the same name the first one wins.

use std::fmt;

use mockery_sdk::{ConstructionError, MockValue};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use super::{MethodSpec, ParameterSpec, TypeSpec};

/// Parameter of a fixed-signature stub
#[derive(Debug, Clone, PartialEq)]
pub struct StubParameter {
    /// Parameter name
    pub name: String,
    /// Type restriction, if any
    pub restriction: Option<String>,
    /// Default value for optional parameters
    pub default: Option<MockValue>,
}

impl From<&ParameterSpec> for StubParameter {
    fn from(param: &ParameterSpec) -> Self {
        Self {
            name: param.name.clone(),
            restriction: param.restriction.clone(),
            default: param.default.clone(),
        }
    }
}

impl fmt::Display for StubParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(restriction) = &self.restriction {
            write!(f, "{} ", restriction)?;
        }
        write!(f, "${}", self.name)?;
        if let Some(default) = &self.default {
            write!(f, "= {}", default)?;
        }
        Ok(())
    }
}

/// Forwarding stub of one method
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Mirrors a single parameter list
    Fixed(Vec<StubParameter>),
    /// One path per declared arity, in declaration order
    Overloaded(Vec<usize>),
}

/// One entry of a proxy's dispatch table
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSlot {
    /// Method name
    pub name: String,
    /// Interface the realized declaration came from
    pub declared_in: String,
    /// Forwarding stub
    pub dispatch: Dispatch,
}

impl MethodSlot {
    /// Build the slot for `method` as declared in `declaring`
    pub fn from_spec(declaring: &TypeSpec, method: &MethodSpec) -> Self {
        let dispatch = match &method.overloads {
            Some(signatures) => {
                let mut arities = Vec::with_capacity(signatures.len());
                for signature in signatures {
                    if !arities.contains(&signature.arity()) {
                        arities.push(signature.arity());
                    }
                }
                Dispatch::Overloaded(arities)
            }
            None => Dispatch::Fixed(method.parameters.iter().map(StubParameter::from).collect()),
        };

        Self {
            name: method.name.clone(),
            declared_in: declaring.name.clone(),
            dispatch,
        }
    }

    /// Argument counts the declaration covers, ascending
    pub fn arities(&self) -> Vec<usize> {
        match &self.dispatch {
            Dispatch::Fixed(params) => {
                let required = params.iter().filter(|p| p.default.is_none()).count();
                (required..=params.len()).collect()
            }
            Dispatch::Overloaded(arities) => {
                let mut sorted = arities.clone();
                sorted.sort_unstable();
                sorted
            }
        }
    }

    /// Whether the slot dispatches on argument count
    pub fn is_overloaded(&self) -> bool {
        matches!(self.dispatch, Dispatch::Overloaded(_))
    }

    /// Bind the supplied arguments to this slot's stub.
    ///
    /// Fixed stubs mirror their parameter list: surplus arguments are dropped,
    /// omitted optional parameters take their defaults and omitted required
    /// ones arrive as null. When `check_types` is set, restrictions are
    /// enforced on the supplied arguments. Overloaded stubs pass the arguments
    /// through unchanged once the arity matches.
    pub fn bind_arguments(
        &self,
        mut args: Vec<MockValue>,
        check_types: bool,
    ) -> Result<Vec<MockValue>, ConstructionError> {
        match &self.dispatch {
            Dispatch::Overloaded(arities) => {
                if arities.contains(&args.len()) {
                    Ok(args)
                } else {
                    Err(self.illegal_count(args.len()))
                }
            }
            Dispatch::Fixed(params) => {
                if args.len() > params.len() {
                    trace!(
                        method = %self.name,
                        dropped = args.len() - params.len(),
                        "surplus arguments dropped"
                    );
                    args.truncate(params.len());
                }

                let supplied = args.len();
                for param in &params[supplied..] {
                    args.push(param.default.clone().unwrap_or(MockValue::Null));
                }

                if check_types {
                    for (index, (param, arg)) in params.iter().zip(&args).take(supplied).enumerate() {
                        let Some(restriction) = &param.restriction else {
                            continue;
                        };
                        // Null passes when it is also the declared default
                        let null_default = arg.is_null() && param.default == Some(MockValue::Null);
                        if !null_default && !arg.satisfies(restriction) {
                            return Err(ConstructionError::TypeRestriction {
                                method: self.name.clone(),
                                position: index + 1,
                                expected: restriction.clone(),
                                got: arg.type_name().to_string(),
                            });
                        }
                    }
                }

                Ok(args)
            }
        }
    }

    fn illegal_count(&self, got: usize) -> ConstructionError {
        ConstructionError::IllegalArgumentCount {
            method: self.name.clone(),
            expected: render_arities(&self.arities()),
            got,
        }
    }
}

impl fmt::Display for MethodSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.dispatch {
            Dispatch::Fixed(params) => {
                write!(f, "{}(", self.name)?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, ")")
            }
            Dispatch::Overloaded(arities) => {
                write!(f, "{}(/* overloaded: {} */)", self.name, render_arities(arities))
            }
        }
    }
}

fn render_arities(arities: &[usize]) -> String {
    match arities {
        [] => "no declared signature".to_string(),
        [only] => only.to_string(),
        [init @ .., last] => {
            let head: Vec<String> = init.iter().map(usize::to_string).collect();
            format!("{} or {}", head.join(", "), last)
        }
    }
}

/// A complete, not yet registered proxy type
#[derive(Debug, Clone)]
pub struct ProxyTypeDefinition {
    /// Synthesized type name
    pub name: String,
    /// Implemented interfaces, in supplied order
    pub interfaces: Vec<String>,
    /// Dispatch table, in realization order
    pub slots: Vec<MethodSlot>,
}

/// Incrementally merges interfaces into a [`ProxyTypeDefinition`]
#[derive(Debug)]
pub struct ProxyTypeBuilder {
    name: String,
    interfaces: Vec<String>,
    slots: Vec<MethodSlot>,
    seen: FxHashSet<String>,
}

impl ProxyTypeBuilder {
    /// Start a definition under the given type name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interfaces: Vec::new(),
            slots: Vec::new(),
            seen: FxHashSet::default(),
        }
    }

    /// Merge an interface's methods; names already realized are skipped
    pub fn add_interface(&mut self, spec: &TypeSpec) -> Result<&mut Self, ConstructionError> {
        if !spec.is_interface() {
            return Err(ConstructionError::NotAnInterface(spec.name.clone()));
        }

        self.interfaces.push(spec.name.clone());
        for method in &spec.methods {
            if !self.seen.insert(method.name.clone()) {
                debug!(
                    proxy = %self.name,
                    interface = %spec.name,
                    method = %method.name,
                    "method already realized, skipping redeclaration"
                );
                continue;
            }
            self.slots.push(MethodSlot::from_spec(spec, method));
        }
        Ok(self)
    }

    /// Finish the definition
    pub fn build(self) -> ProxyTypeDefinition {
        ProxyTypeDefinition {
            name: self.name,
            interfaces: self.interfaces,
            slots: self.slots,
        }
    }
}
