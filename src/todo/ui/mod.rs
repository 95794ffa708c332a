pub mod input_handler;
pub mod presenter;
pub mod render;

// Re-export functions for external use:
pub use input_handler::run_app;
pub use presenter::Presenter;
