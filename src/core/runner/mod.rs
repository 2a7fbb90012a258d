//! Runner module for linking operations.
//!
//! - `traits.rs` - `RunResult`, the outcome handed back to `main`
//! - `link_runner.rs` - the driver that resolves the credential, locates the
//!   board, and processes the issue batch

pub mod link_runner;
pub mod traits;

pub use link_runner::LinkRunner;
pub use traits::RunResult;
