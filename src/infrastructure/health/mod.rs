//! Health gating for the launched backend.

pub mod gate;

pub use gate::HealthGate;
