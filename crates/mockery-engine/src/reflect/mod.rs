//! Reflection and Proxy Runtime
//!
//! This module turns interface descriptors into proxy types whose methods
//! all forward to an [`InvocationHandler`].
//!
//! ## Pieces
//!
//! - [`TypeSpec`], [`MethodSpec`], [`ParameterSpec`]: read-only descriptors
//! - [`LoadingContext`]: resolves names to descriptors, scopes the proxy cache
//! - [`ProxyTypeBuilder`]: merges interfaces into a dispatch table
//! - [`TypeRegistry`]: registers synthesized types by name
//! - [`ProxyTypeFactory`]: validates, caches and synthesizes proxy types
//! - [`ProxyInstance`]: a proxy bound to one (rebindable) handler

mod introspection;
mod loading_context;
mod proxy;
mod type_builder;
mod type_registry;

pub use introspection::{MethodSpec, OverloadSignature, ParameterSpec, TypeKind, TypeSpec};
pub use loading_context::LoadingContext;
pub use proxy::{InvocationHandler, ProxyInstance, ProxyType, ProxyTypeFactory, PROXY_PREFIX};
pub use type_builder::{Dispatch, MethodSlot, ProxyTypeBuilder, ProxyTypeDefinition, StubParameter};
pub use type_registry::TypeRegistry;
