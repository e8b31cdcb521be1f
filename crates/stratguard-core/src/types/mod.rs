pub mod collections;
pub mod severity;
