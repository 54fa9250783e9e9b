// ABOUTME: Command implementations for each CLI verb
// ABOUTME: Exports init, sync, status, validate, and target commands

pub mod init;
pub mod status;
pub mod sync;
pub mod target;
pub mod validate;

pub use init::init;
pub use status::status;
pub use sync::sync;
pub use target::target;
pub use validate::validate;
