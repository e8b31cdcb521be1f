//! Execute-stage collaborators. The core only sees [`CodeRunner`].

pub mod guarded;
pub mod process;
pub mod traits;

pub use guarded::GuardedRunner;
pub use process::ProcessRunner;
pub use traits::{CodeRunner, FailureKind, RunOutcome};
