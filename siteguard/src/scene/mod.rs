pub mod loader;
pub mod schema;

// Re-export for convenience
pub use loader::SnapshotLoader;
pub use schema::*;
