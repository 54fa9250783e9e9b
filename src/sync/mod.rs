// ABOUTME: Incremental synchronization engine
// ABOUTME: Change detection, dimension resolution, fact loading, orchestration

pub mod detector;
pub mod error;
pub mod loader;
pub mod orchestrator;
pub mod resolver;

pub use detector::{ChangeDetector, SalesChangeDetector};
pub use error::{ResolutionError, SyncError};
pub use loader::{FactLoader, WarehouseLoader};
pub use orchestrator::{Orchestrator, RunState};
pub use resolver::{DimensionResolver, ModuloResolver};
