// This module contains the definition of `F64`.
mod float;

// Re-exports.
pub use float::F64;
