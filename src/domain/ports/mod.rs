//! Port trait definitions
//!
//! Async trait interfaces at the collaborator seams:
//! - `RequestRouter`: the external routing component control is handed to
//! - `Precondition`: one idempotent environment requirement
//!
//! Infrastructure adapters implement these; the domain stays independent of
//! any particular router or operating-system integration.

pub mod precondition;
pub mod router;

pub use precondition::Precondition;
pub use router::RequestRouter;
