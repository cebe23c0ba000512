//! Proxy Types and Instances
//!
//! A proxy type implements a set of interfaces by routing every method call
//! through a bound [`InvocationHandler`]. Instead of generating code, the
//! factory builds a dispatch table (see [`type_builder`](super::type_builder))
//! once per interface set and caches it for the lifetime of the process.
//!
//! ## Cache
//!
//! Types are keyed by `"<context id>:<sorted interface names joined by ';'>"`.
//! Lookups of an existing key only take the shared read lock. A miss takes the
//! write lock, checks again, then allocates a name from the process-wide
//! counter, builds, registers and caches the type, so each key is synthesized
//! at most once even under concurrent callers.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let ty = ProxyTypeFactory::create_proxy_type(&context, &[icontext])?;
//! let proxy = Arc::new(ty.instantiate(handler));
//! let granted = proxy.invoke("hasPermission", vec!["rt=foo".into()])?;
//! ```

use std::fmt;
use std::sync::Arc;

use mockery_sdk::{ConstructionError, FromMock, InvocationError, InvocationResult, MockValue, ObjectRef};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::type_builder::{MethodSlot, ProxyTypeBuilder, ProxyTypeDefinition};
use super::type_registry::TypeRegistry;
use super::{LoadingContext, TypeSpec};

/// Prefix of synthesized type names. `·` cannot appear in a declared type
/// name, so synthesized names never collide with user types.
pub const PROXY_PREFIX: &str = "Proxy·";

/// Single entry point every proxied call funnels into
pub trait InvocationHandler: Send + Sync {
    /// Handle a call of `method` on `proxy` with the bound argument list.
    ///
    /// The result is returned to the caller verbatim and errors propagate
    /// unchanged.
    fn handle(&self, proxy: &ProxyInstance, method: &str, args: Vec<MockValue>) -> InvocationResult;
}

impl<F> InvocationHandler for F
where
    F: Fn(&ProxyInstance, &str, Vec<MockValue>) -> InvocationResult + Send + Sync,
{
    fn handle(&self, proxy: &ProxyInstance, method: &str, args: Vec<MockValue>) -> InvocationResult {
        self(proxy, method, args)
    }
}

// ============================================================================
// ProxyType
// ============================================================================

/// A synthesized type: name, implemented interfaces and dispatch table
#[derive(Debug)]
pub struct ProxyType {
    id: usize,
    name: String,
    cache_key: String,
    interfaces: Vec<String>,
    slots: Vec<MethodSlot>,
    slot_index: FxHashMap<String, usize>,
}

impl ProxyType {
    pub(crate) fn from_definition(definition: ProxyTypeDefinition, id: usize, cache_key: String) -> Self {
        let slot_index = definition
            .slots
            .iter()
            .enumerate()
            .map(|(index, slot)| (slot.name.clone(), index))
            .collect();

        Self {
            id,
            name: definition.name,
            cache_key,
            interfaces: definition.interfaces,
            slots: definition.slots,
            slot_index,
        }
    }

    /// Counter value this type was synthesized with
    pub fn id(&self) -> usize {
        self.id
    }

    /// Synthesized type name (`Proxy·<id>`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key this type is cached under
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    /// Implemented interfaces, in the order first supplied
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    /// Whether the type implements `interface`
    pub fn implements(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|i| i == interface)
    }

    /// Check if the dispatch table has a method
    pub fn has_method(&self, name: &str) -> bool {
        self.slot_index.contains_key(name)
    }

    /// Get a dispatch table entry
    pub fn method(&self, name: &str) -> Option<&MethodSlot> {
        self.slot_index.get(name).map(|&index| &self.slots[index])
    }

    /// Method names in realization order
    pub fn method_names(&self) -> Vec<&str> {
        self.slots.iter().map(|slot| slot.name.as_str()).collect()
    }

    /// Argument counts `name` accepts
    pub fn arities(&self, name: &str) -> Option<Vec<usize>> {
        self.method(name).map(MethodSlot::arities)
    }

    /// Create an instance bound to `handler`
    pub fn instantiate(self: &Arc<Self>, handler: Arc<dyn InvocationHandler>) -> ProxyInstance {
        ProxyInstance {
            proxy_type: Arc::clone(self),
            handler: RwLock::new(handler),
            check_types: true,
        }
    }
}

// ============================================================================
// ProxyInstance
// ============================================================================

/// An instance of a proxy type bound to exactly one handler at a time
pub struct ProxyInstance {
    proxy_type: Arc<ProxyType>,
    handler: RwLock<Arc<dyn InvocationHandler>>,
    check_types: bool,
}

impl ProxyInstance {
    /// Enable or disable parameter type restriction checks
    pub fn with_type_checks(mut self, enabled: bool) -> Self {
        self.check_types = enabled;
        self
    }

    /// The instance's type
    pub fn proxy_type(&self) -> &Arc<ProxyType> {
        &self.proxy_type
    }

    /// Whether type restrictions are enforced
    pub fn type_checks_enabled(&self) -> bool {
        self.check_types
    }

    /// Call a method through the dispatch table
    pub fn invoke(&self, method: &str, args: Vec<MockValue>) -> InvocationResult {
        let slot = self
            .proxy_type
            .method(method)
            .ok_or_else(|| ConstructionError::UndefinedMethod {
                type_name: self.proxy_type.name.clone(),
                method: method.to_string(),
            })?;
        let args = slot.bind_arguments(args, self.check_types)?;

        // Release the lock before dispatch so the handler may rebind
        let handler = Arc::clone(&*self.handler.read());
        trace!(proxy = %self.proxy_type.name, method = %slot.name, args = args.len(), "dispatch");
        handler.handle(self, &slot.name, args)
    }

    /// Call a method and convert its result
    pub fn call<T: FromMock>(&self, method: &str, args: Vec<MockValue>) -> Result<T, InvocationError> {
        let value = self.invoke(method, args)?;
        Ok(T::from_mock(&value)?)
    }

    /// Bind a new handler, returning the previous one
    pub fn bind(&self, handler: Arc<dyn InvocationHandler>) -> Arc<dyn InvocationHandler> {
        std::mem::replace(&mut *self.handler.write(), handler)
    }

    /// The currently bound handler
    pub fn handler(&self) -> Arc<dyn InvocationHandler> {
        Arc::clone(&*self.handler.read())
    }

    /// Wrap this instance as an object value implementing its interfaces
    pub fn to_value(self: &Arc<Self>) -> MockValue {
        let object = ObjectRef::from_arc(self.proxy_type.name.clone(), Arc::clone(self))
            .with_interfaces(self.proxy_type.interfaces.iter().cloned());
        MockValue::Object(object)
    }
}

impl fmt::Debug for ProxyInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyInstance")
            .field("type", &self.proxy_type.name)
            .field("interfaces", &self.proxy_type.interfaces)
            .finish()
    }
}

// ============================================================================
// ProxyTypeFactory
// ============================================================================

struct ProxyCache {
    types: FxHashMap<String, Arc<ProxyType>>,
    next_id: usize,
}

/// Process-wide cache and name counter; created on first use, never reset
static PROXY_CACHE: Lazy<RwLock<ProxyCache>> = Lazy::new(|| {
    RwLock::new(ProxyCache {
        types: FxHashMap::default(),
        next_id: 0,
    })
});

/// Synthesizes and caches proxy types
pub struct ProxyTypeFactory;

impl ProxyTypeFactory {
    /// Get (or synthesize) the proxy type implementing `interfaces`.
    ///
    /// Fails if `interfaces` is empty or contains a non-interface type.
    pub fn create_proxy_type<S: AsRef<TypeSpec>>(
        context: &LoadingContext,
        interfaces: &[S],
    ) -> Result<Arc<ProxyType>, ConstructionError> {
        let specs: Vec<&TypeSpec> = interfaces.iter().map(|spec| spec.as_ref()).collect();
        if specs.is_empty() {
            return Err(ConstructionError::EmptyInterfaces);
        }
        if let Some(concrete) = specs.iter().find(|spec| !spec.is_interface()) {
            return Err(ConstructionError::NotAnInterface(concrete.name.clone()));
        }

        let key = cache_key(context, &specs);
        if let Some(cached) = PROXY_CACHE.read().types.get(&key) {
            trace!(key = %key, proxy = %cached.name, "proxy cache hit");
            return Ok(Arc::clone(cached));
        }

        let mut cache = PROXY_CACHE.write();
        if let Some(cached) = cache.types.get(&key) {
            return Ok(Arc::clone(cached));
        }

        let id = cache.next_id;
        cache.next_id += 1;
        let name = format!("{}{}", PROXY_PREFIX, id);

        let mut builder = ProxyTypeBuilder::new(name.clone());
        for spec in &specs {
            builder.add_interface(spec)?;
        }

        let proxy_type = TypeRegistry::global()
            .define(builder.build(), id, key.clone())
            .map_err(|source| ConstructionError::Registration {
                name: name.clone(),
                source,
            })?;

        debug!(
            key = %key,
            proxy = %name,
            methods = proxy_type.slots.len(),
            "synthesized proxy type"
        );
        cache.types.insert(key, Arc::clone(&proxy_type));
        Ok(proxy_type)
    }

    /// `create_proxy_type` followed by `instantiate`
    pub fn create_proxy_instance<S: AsRef<TypeSpec>>(
        context: &LoadingContext,
        interfaces: &[S],
        handler: Arc<dyn InvocationHandler>,
    ) -> Result<ProxyInstance, ConstructionError> {
        Ok(Self::create_proxy_type(context, interfaces)?.instantiate(handler))
    }

    /// Number of cached proxy types (across all contexts)
    pub fn cached_count() -> usize {
        PROXY_CACHE.read().types.len()
    }
}

fn cache_key(context: &LoadingContext, interfaces: &[&TypeSpec]) -> String {
    let mut names: Vec<&str> = interfaces.iter().map(|spec| spec.name.as_str()).collect();
    names.sort_unstable();
    format!("{}:{}", context.id(), names.join(";"))
}
