//! Dataset discovery: one module per JSON-lines dump.
//!
//! Each discoverer consumes typed records one at a time (`ingest`) and
//! keeps its own summary counters, so the same code path serves the
//! directory reader and in-memory tests.

pub mod drug;
pub mod moa;
pub mod target;

pub use drug::{discover_drugs, DrugDiscovery};
pub use moa::{discover_moa, MoaDiscovery};
pub use target::{discover_targets, strip_isoform, TargetDiscovery};
