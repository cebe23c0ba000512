//! Registry of synthesized proxy types
//!
//! Accepts a [`ProxyTypeDefinition`] and a name, validates it, and returns the
//! instantiable [`ProxyType`]. The factory registers every type it synthesizes
//! in the process-wide registry; separate registries can be created for tests.

use std::sync::Arc;

use mockery_sdk::RegistrationError;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::proxy::ProxyType;
use super::type_builder::ProxyTypeDefinition;

static GLOBAL_REGISTRY: Lazy<TypeRegistry> = Lazy::new(TypeRegistry::new);

/// Name-indexed table of registered proxy types
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: RwLock<FxHashMap<String, Arc<ProxyType>>>,
}

impl TypeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by the proxy factory
    pub fn global() -> &'static TypeRegistry {
        &GLOBAL_REGISTRY
    }

    /// Register a definition under its name
    pub fn define(
        &self,
        definition: ProxyTypeDefinition,
        id: usize,
        cache_key: String,
    ) -> Result<Arc<ProxyType>, RegistrationError> {
        validate(&definition)?;

        let mut types = self.types.write();
        if types.contains_key(&definition.name) {
            return Err(RegistrationError::DuplicateName(definition.name));
        }

        let name = definition.name.clone();
        let proxy_type = Arc::new(ProxyType::from_definition(definition, id, cache_key));
        types.insert(name, Arc::clone(&proxy_type));
        Ok(proxy_type)
    }

    /// Get a type by name
    pub fn get(&self, name: &str) -> Option<Arc<ProxyType>> {
        self.types.read().get(name).cloned()
    }

    /// Every registered type synthesized under `cache_key`
    pub fn types_for_key(&self, cache_key: &str) -> Vec<Arc<ProxyType>> {
        self.types
            .read()
            .values()
            .filter(|ty| ty.cache_key() == cache_key)
            .cloned()
            .collect()
    }

    /// Check if a type is registered
    pub fn contains(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}

fn validate(definition: &ProxyTypeDefinition) -> Result<(), RegistrationError> {
    if definition.name.is_empty() {
        return Err(RegistrationError::EmptyName);
    }
    for slot in &definition.slots {
        if !is_identifier(&slot.name) {
            return Err(RegistrationError::MalformedMethod {
                type_name: definition.name.clone(),
                method: slot.name.clone(),
            });
        }
    }
    Ok(())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
