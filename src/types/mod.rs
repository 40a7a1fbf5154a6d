//! Domain-based type organization
//!
//! Types are organized by domain to match the structure in `update/`:
//! - panel: panel selection
//! - config: device configuration form
//! - telemetry: station readings and dashboard projection

pub mod config;
pub mod panel;
pub mod telemetry;

// Re-export all types for convenient access
pub use config::*;
pub use panel::*;
pub use telemetry::*;
