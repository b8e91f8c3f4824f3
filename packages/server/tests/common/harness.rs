//! Test harness over in-memory stores and mock collaborators.
//!
//! Every test gets a fresh store, directory and notifier, so tests never
//! share state and need no database.

use std::sync::Arc;

use collab_core::common::{Actor, ActorRole};
use collab_core::config::LifecyclePolicy;
use collab_core::kernel::test_dependencies::{MockActorDirectory, SpyNotifier};
use collab_core::kernel::{BaseNotifier, ServerDeps, TestDependencies};
use collab_core::domains::collaboration::InMemoryRequestStore;
use collab_core::domains::analytics::InMemoryViewEventLog;
use test_context::AsyncTestContext;

use super::GraphQLClient;

/// Test harness that wires domain actions to in-memory infrastructure.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let brand = ctx.brand();
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    pub deps: Arc<ServerDeps>,
    pub requests: Arc<InMemoryRequestStore>,
    pub view_events: Arc<InMemoryViewEventLog>,
    pub directory: Arc<MockActorDirectory>,
    pub notifier: Arc<SpyNotifier>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::from_test_deps(TestDependencies::new())
    }

    /// Harness with a custom lifecycle policy (TTL, notify timeout, batch size).
    pub fn with_lifecycle(lifecycle: LifecyclePolicy) -> Self {
        Self::from_test_deps(TestDependencies::new().lifecycle(lifecycle))
    }

    /// Harness whose notifications go to `notifier` instead of the spy.
    pub fn with_notifier(notifier: Arc<dyn BaseNotifier>, lifecycle: LifecyclePolicy) -> Self {
        Self::from_test_deps(TestDependencies::new().notifier(notifier).lifecycle(lifecycle))
    }

    fn from_test_deps(test_deps: TestDependencies) -> Self {
        init_tracing();

        let requests = test_deps.requests.clone();
        let view_events = test_deps.view_events.clone();
        let directory = test_deps.directory.clone();
        let notifier = test_deps.notifier.clone();

        Self {
            deps: Arc::new(test_deps.into_server_deps()),
            requests,
            view_events,
            directory,
            notifier,
        }
    }

    pub fn deps(&self) -> &ServerDeps {
        &self.deps
    }

    /// Register an active brand account.
    pub fn brand(&self) -> Actor {
        Actor::new(self.directory.register(ActorRole::Brand), ActorRole::Brand)
    }

    /// Register an active creator account.
    pub fn creator(&self) -> Actor {
        Actor::new(self.directory.register(ActorRole::Creator), ActorRole::Creator)
    }

    /// Register an admin account.
    pub fn admin(&self) -> Actor {
        Actor::new(self.directory.register(ActorRole::Admin), ActorRole::Admin)
    }

    /// GraphQL client acting as `actor`.
    pub fn graphql(&self, actor: &Actor) -> GraphQLClient {
        GraphQLClient::authenticated(self.deps.clone(), *actor)
    }

    /// GraphQL client without credentials.
    pub fn graphql_anonymous(&self) -> GraphQLClient {
        GraphQLClient::anonymous(self.deps.clone())
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new()
    }

    async fn teardown(self) {}
}

/// Respect RUST_LOG in tests; safe to call repeatedly.
/// Run tests with: RUST_LOG=debug cargo test -- --nocapture
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
