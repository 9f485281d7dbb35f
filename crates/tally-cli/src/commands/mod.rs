//! Command implementations.

mod consolidate;
mod filter;
mod review;
mod run;
mod verify;

pub use consolidate::execute_consolidate;
pub use filter::execute_filter;
pub use review::execute_review;
pub use run::execute_run;
pub use verify::execute_verify;
