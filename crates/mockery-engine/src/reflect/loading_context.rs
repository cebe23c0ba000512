//! Loading Contexts
//!
//! A loading context resolves type names to descriptors and scopes the proxy
//! cache: the same interface set requested through two different contexts
//! yields two distinct proxy types.
//!
//! Contexts are cheap handles; clones share the same identity and type table.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mockery_sdk::ConstructionError;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::TypeSpec;

/// Global counter for context IDs (0 is the system context)
static NEXT_CONTEXT_ID: AtomicUsize = AtomicUsize::new(1);

/// The process-wide default context
static SYSTEM_CONTEXT: Lazy<LoadingContext> = Lazy::new(|| LoadingContext::with_id(0, "system"));

struct ContextInner {
    id: usize,
    name: String,
    types: RwLock<FxHashMap<String, Arc<TypeSpec>>>,
}

/// Identity + type table used to resolve interfaces
#[derive(Clone)]
pub struct LoadingContext {
    inner: Arc<ContextInner>,
}

impl LoadingContext {
    /// Create a fresh context with its own identity
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed), name)
    }

    fn with_id(id: usize, name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                id,
                name: name.into(),
                types: RwLock::new(FxHashMap::default()),
            }),
        }
    }

    /// The shared system context
    pub fn system() -> LoadingContext {
        SYSTEM_CONTEXT.clone()
    }

    /// Context identity, used in proxy cache keys
    pub fn id(&self) -> usize {
        self.inner.id
    }

    /// Context name
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Define (or redefine) a type in this context
    pub fn define(&self, spec: TypeSpec) -> Arc<TypeSpec> {
        let spec = Arc::new(spec);
        self.inner
            .types
            .write()
            .insert(spec.name.clone(), Arc::clone(&spec));
        spec
    }

    /// Resolve a type by name
    pub fn load(&self, name: &str) -> Result<Arc<TypeSpec>, ConstructionError> {
        self.inner
            .types
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| ConstructionError::ClassNotFound(name.to_string()))
    }

    /// Check if a type is defined
    pub fn is_defined(&self, name: &str) -> bool {
        self.inner.types.read().contains_key(name)
    }

    /// Number of defined types
    pub fn type_count(&self) -> usize {
        self.inner.types.read().len()
    }
}

impl PartialEq for LoadingContext {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for LoadingContext {}

impl fmt::Debug for LoadingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadingContext")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .finish()
    }
}
