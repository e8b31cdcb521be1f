//! Fix generation and application.

pub mod applier;
pub mod generators;
pub mod registry;
pub mod traits;
pub mod types;

pub use applier::{AppliedPatch, FixApplier};
pub use registry::{create_default_fixers, FixProposals, FixerRegistry};
pub use traits::FixGenerator;
pub use types::{ConflictReason, EditKind, Fix, FixConflict, FixGenerationFailure, FixType};
