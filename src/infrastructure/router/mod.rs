//! Adapters for the external request router.

pub mod exec;

pub use exec::ExecRouter;
