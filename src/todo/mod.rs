pub mod coordinator;
pub mod models;
pub mod store;
pub mod ui;

// Re-export commonly used items for convenience
pub use coordinator::Coordinator;
pub use store::TaskStore;
pub use ui::{Presenter, run_app};
