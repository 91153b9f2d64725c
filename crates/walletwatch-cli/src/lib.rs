/*
[INPUT]:  Public API exports for the walletwatch CLI crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point shared with the binary
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod context;

// Re-export main types for convenience
pub use config::{CliConfig, ProviderAccountConfig};
pub use context::AppContext;
