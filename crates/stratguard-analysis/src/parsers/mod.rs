//! SourceModel: turns source text into an immutable [`source_unit::SourceUnit`].

pub mod cache;
pub mod hasher;
pub mod manager;
pub mod python;
pub mod source_unit;

pub use manager::SourceParser;
pub use source_unit::{SourceUnit, SyntaxDiagnostic};
