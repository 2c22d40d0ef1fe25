//! Backend process launch and log sink handling.

pub mod supervisor;

pub use supervisor::{tail_lines, BackendHandle, BackendSupervisor};
