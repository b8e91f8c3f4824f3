//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod directory;
pub mod notifier;
pub mod retry;
pub mod scheduled_tasks;
pub mod stream_hub;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use directory::PostgresActorDirectory;
pub use notifier::StreamHubNotifier;
pub use retry::retry_read;
pub use stream_hub::{actor_topic, StreamHub};
pub use test_dependencies::TestDependencies;
pub use traits::*;
