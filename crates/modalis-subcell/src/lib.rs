//! modalis-subcell — UniProt subcellular location vocabulary and location clustering.
//!
//! Two layers:
//! - `VocabularyRegistry`: parses the UniProt SL flat file into a code ↔ name registry
//! - `ClusterResolver`: collapses canonical locations into four analysis clusters and
//!   picks one representative cluster per entity
//!
//! Usage:
//! ```ignore
//! let vocab = VocabularyRegistry::from_path("datasets/subcell_uniprot.txt")?;
//! let resolver = ClusterResolver::new(&vocab, ClusterTable::uniprot())?;
//! assert_eq!(resolver.classify("SL-0191"), Cluster::Nucleus);
//! ```

pub mod cluster;
pub mod vocabulary;

pub use cluster::{Cluster, ClusterResolver, ClusterTable};
pub use vocabulary::{Translation, VocabularyEntry, VocabularyOptions, VocabularyRegistry};
