//! modalis-ingestion — Dataset discovery and aggregation.
//! - Drug / mechanism-of-action / target discovery from JSON-lines dumps
//! - Subcellular location translation and clustering per target
//! - Drug ⋈ MoA ⋈ target merge
//! - Per-drug representative cluster registry
//! - CSV tables and run reports

pub mod clusters;
pub mod jsonl;
pub mod merge;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod sources;
pub mod table;
