//! Developer Tooling: read-only world inspection for the CLI and debugging.
//!
//! # Invariants
//! - Tools never mutate the world they inspect.

mod inspector;

pub use inspector::{EntityInfo, WorldInspector, WorldSummary};
