pub mod command_dispatcher;
pub mod coordinator;
pub mod registry;
pub mod status_cache;
pub mod target_reconciler;

pub use command_dispatcher::CommandDispatcher;
pub use coordinator::DeviceCoordinator;
pub use registry::CoordinatorRegistry;
pub use status_cache::{StatusCache, StatusSnapshot};
pub use target_reconciler::{TargetReconciler, TargetState};
