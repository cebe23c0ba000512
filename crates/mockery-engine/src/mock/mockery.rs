//! Mock controller
//!
//! Owns the mocks of one fixture: creates them in the recording state and
//! swaps them to replaying together.
//!
//! ```rust,ignore
//! let mut mockery = Mockery::new();
//! let context = mockery.create_mock("IContext")?;
//! context
//!     .call::<MethodOptions>("hasPermission", vec!["rt=foo".into()])?
//!     .returns(true);
//! mockery.replay_all()?;
//! assert_eq!(context.call::<bool>("hasPermission", vec!["rt=foo".into()])?, true);
//! ```

use std::sync::Arc;

use mockery_sdk::ConstructionError;
use tracing::debug;

use super::{ExpectationStore, RecordState, ReplayState, StateKind, VerificationError};
use crate::config::MockeryConfig;
use crate::reflect::{LoadingContext, ProxyInstance, ProxyTypeFactory, TypeSpec};

#[derive(Debug)]
struct MockEntry {
    proxy: Arc<ProxyInstance>,
    store: Arc<ExpectationStore>,
    state: StateKind,
}

/// Creates record/replay mocks and drives their phase switch
#[derive(Debug)]
pub struct Mockery {
    context: LoadingContext,
    config: MockeryConfig,
    mocks: Vec<MockEntry>,
}

impl Default for Mockery {
    fn default() -> Self {
        Self::new()
    }
}

impl Mockery {
    /// Use the system context and the environment's configuration
    pub fn new() -> Self {
        Self::with_config(MockeryConfig::from_env())
    }

    /// Use the system context and `config`
    pub fn with_config(config: MockeryConfig) -> Self {
        Self {
            context: LoadingContext::system(),
            config,
            mocks: Vec::new(),
        }
    }

    /// Resolve interface names through `context`
    pub fn with_context(mut self, context: LoadingContext) -> Self {
        self.context = context;
        self
    }

    /// The context interface names are resolved in
    pub fn context(&self) -> &LoadingContext {
        &self.context
    }

    /// Active configuration
    pub fn config(&self) -> &MockeryConfig {
        &self.config
    }

    /// Create a recording mock of the interface named `name`
    pub fn create_mock(&mut self, name: &str) -> Result<Arc<ProxyInstance>, ConstructionError> {
        let spec = self.context.load(name)?;
        self.create_mock_for(&[spec])
    }

    /// Create a recording mock implementing `interfaces`
    pub fn create_mock_for<S: AsRef<TypeSpec>>(
        &mut self,
        interfaces: &[S],
    ) -> Result<Arc<ProxyInstance>, ConstructionError> {
        let store = Arc::new(
            ExpectationStore::new().with_unexpected_warnings(self.config.log_unexpected_calls),
        );
        let recorder = Arc::new(RecordState::new(Arc::clone(&store)));
        let proxy = Arc::new(
            ProxyTypeFactory::create_proxy_instance(&self.context, interfaces, recorder)?
                .with_type_checks(self.config.check_type_restrictions),
        );

        debug!(proxy = %proxy.proxy_type().name(), mocks = self.mocks.len() + 1, "created mock");
        self.mocks.push(MockEntry {
            proxy: Arc::clone(&proxy),
            store,
            state: StateKind::Recording,
        });
        Ok(proxy)
    }

    /// Finish recording and switch every recording mock to replaying.
    ///
    /// Mocks already replaying are left alone, so this can be called again
    /// after creating more mocks.
    pub fn replay_all(&mut self) -> Result<(), ConstructionError> {
        let mut swapped = 0;
        for entry in self.mocks.iter_mut().filter(|e| e.state == StateKind::Recording) {
            entry.store.finalize();
            let replayer = ReplayState::new(Arc::clone(&entry.store))?;
            entry.proxy.bind(Arc::new(replayer));
            entry.state = StateKind::Replaying;
            swapped += 1;
        }
        debug!(swapped, total = self.mocks.len(), "replaying mocks");
        Ok(())
    }

    /// Verify every mock, collecting all failures into one report
    pub fn verify_all(&self) -> Result<(), VerificationError> {
        let mut report = VerificationError::default();
        for entry in &self.mocks {
            if let Err(failure) = entry.store.verify() {
                report.merge(failure);
            }
        }
        if report.is_empty() {
            Ok(())
        } else {
            Err(report)
        }
    }

    /// Whether mocks exist and all of them are replaying
    pub fn is_replaying(&self) -> bool {
        !self.mocks.is_empty() && self.mocks.iter().all(|e| e.state == StateKind::Replaying)
    }

    /// Number of mocks created
    pub fn mock_count(&self) -> usize {
        self.mocks.len()
    }

    /// The store backing `mock`, if this controller created it
    pub fn store_of(&self, mock: &Arc<ProxyInstance>) -> Option<&Arc<ExpectationStore>> {
        self.mocks
            .iter()
            .find(|entry| Arc::ptr_eq(&entry.proxy, mock))
            .map(|entry| &entry.store)
    }
}
