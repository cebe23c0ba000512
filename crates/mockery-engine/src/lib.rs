//! Mockery Engine
//!
//! This crate provides the dynamic-dispatch core of the Mockery library:
//! - **Reflect**: interface descriptors, loading contexts and the cached proxy
//!   type factory (`reflect` module)
//! - **Mock**: expectation stores and the record/replay states installed as
//!   proxy handlers (`mock` module)
//! - **Config**: per-controller settings (`config` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use mockery_engine::{LoadingContext, MethodOptions, MethodSpec, Mockery, TypeSpec};
//!
//! let context = LoadingContext::new("tests");
//! context.define(TypeSpec::interface("IContext").method(MethodSpec::new("hasPermission")));
//!
//! let mut mockery = Mockery::new().with_context(context);
//! let mock = mockery.create_mock("IContext")?;
//!
//! // Record
//! mock.call::<MethodOptions>("hasPermission", vec![])?.returns(true);
//!
//! // Replay
//! mockery.replay_all()?;
//! assert!(mock.call::<bool>("hasPermission", vec![])?);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// ============================================================================
// Core Modules
// ============================================================================

/// Reflect module: descriptors, loading contexts and proxy synthesis
pub mod reflect;

/// Mock module: expectations and record/replay states
pub mod mock;

/// Config module: settings applied by `Mockery`
pub mod config;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::MockeryConfig;

pub use reflect::{
    // Descriptors
    MethodSpec, OverloadSignature, ParameterSpec, TypeKind, TypeSpec,
    // Contexts
    LoadingContext,
    // Synthesis
    Dispatch, MethodSlot, ProxyTypeBuilder, ProxyTypeDefinition, StubParameter, TypeRegistry,
    // Proxies
    InvocationHandler, ProxyInstance, ProxyType, ProxyTypeFactory, PROXY_PREFIX,
};

pub use mock::{
    // Expectations
    Expectation, ExpectationList, ExpectationOutcome, MethodOptions,
    // Store
    ExpectationStore, NextExpectation, UnexpectedCall, VerificationError,
    // States
    MockState, RecordState, ReplayState, StateKind,
    // Controller
    Mockery,
};

pub use mockery_sdk::{
    ConstructionError, ConversionError, FromMock, InvocationError, InvocationResult, MockValue,
    ObjectRef, RaisedError, RegistrationError,
};
