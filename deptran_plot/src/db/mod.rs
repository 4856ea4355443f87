mod document;
mod locate;

// Re-exports.
pub use document::{derived_path, DocumentLoader};
pub use locate::{locate, DERIVED_MARKER};
