//! Location clustering.
//!
//! Collapses the ~500 UniProt location names into four analysis clusters
//! (Secreted, Surface, Cytoplasm, Nucleus) and picks one representative
//! cluster for an entity observed in several of them.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use modalis_common::{ModalisError, Result};
use serde::{Deserialize, Serialize};

use crate::vocabulary::VocabularyRegistry;

/// Coarse subcellular location cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Cluster {
    Secreted,
    Surface,
    Cytoplasm,
    Nucleus,
    /// Not in the vocabulary or not in any cluster.
    Unknown,
}

impl Cluster {
    /// Fixed enumeration order of the member clusters.
    pub const KNOWN: [Cluster; 4] = [
        Cluster::Secreted,
        Cluster::Surface,
        Cluster::Cytoplasm,
        Cluster::Nucleus,
    ];

    /// Tie-break order for representative selection, highest first.
    pub const PRIORITY: [Cluster; 5] = [
        Cluster::Surface,
        Cluster::Secreted,
        Cluster::Nucleus,
        Cluster::Cytoplasm,
        Cluster::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cluster::Secreted => "Secreted",
            Cluster::Surface => "Surface",
            Cluster::Cytoplasm => "Cytoplasm",
            Cluster::Nucleus => "Nucleus",
            Cluster::Unknown => "Unknown",
        }
    }

    /// Position in [`Cluster::PRIORITY`]; 0 wins ties.
    pub fn priority_rank(self) -> usize {
        match self {
            Cluster::Surface => 0,
            Cluster::Secreted => 1,
            Cluster::Nucleus => 2,
            Cluster::Cytoplasm => 3,
            Cluster::Unknown => 4,
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cluster {
    type Err = ModalisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Secreted" => Ok(Cluster::Secreted),
            "Surface" => Ok(Cluster::Surface),
            "Cytoplasm" => Ok(Cluster::Cytoplasm),
            "Nucleus" => Ok(Cluster::Nucleus),
            "Unknown" => Ok(Cluster::Unknown),
            other => Err(ModalisError::InvalidInput(format!("unknown cluster '{other}'"))),
        }
    }
}

// ── Curated membership ────────────────────────────────────────────────────────

const SECRETED: &[&str] = &["Secreted"];

const SURFACE: &[&str] = &[
    "Apical cell membrane", "Basal cell membrane", "Basolateral cell membrane", "Cell membrane",
    "Cell surface", "Endosome membrane", "Lateral cell membrane", "Postsynaptic cell membrane",
    "Presynaptic cell membrane",
];

const CYTOPLASM: &[&str] = &[
    "Cell junction", "Cell projection", "Centriolar satellite", "Cleavage furrow",
    "Cytolytic granule membrane", "Cytoplasm", "Cytoplasmic granule",
    "Cytoplasmic ribonucleoprotein granule", "Cytoplasmic vesicle", "Cytoplasmic vesicle lumen",
    "Cytoplasmic vesicle membrane", "Cytoskeleton", "Cytosol", "Dynein axonemal particle",
    "Early endosome", "Early endosome membrane", "Endomembrane system", "Endoplasmic reticulum",
    "Endoplasmic reticulum lumen", "Endoplasmic reticulum membrane", "Endosome", "Endosome lumen",
    "Extracellular vesicle", "Focal adhesion", "Golgi apparatus", "Golgi apparatus membrane",
    "Golgi outpost", "Inflammasome", "Late endosome", "Late endosome membrane", "Lipid droplet",
    "Lysosome", "Lysosome lumen", "Lysosome membrane", "Melanosome", "Melanosome membrane",
    "Membrane", "Membrane raft", "Microsome", "Microsome membrane", "Midbody", "Midbody ring",
    "Mitochondrion", "Mitochondrion inner membrane", "Mitochondrion intermembrane space",
    "Mitochondrion matrix", "Mitochondrion membrane", "Mitochondrion outer membrane",
    "Perikaryon", "Peroxisome", "Peroxisome matrix", "Peroxisome membrane",
    "Photoreceptor inner segment", "Postsynapse", "Postsynaptic density",
    "Postsynaptic density membrane", "Presynapse", "Recycling endosome",
    "Recycling endosome membrane", "Rough endoplasmic reticulum",
    "Sarcoplasmic reticulum membrane", "Synapse", "Vesicle", "Virion",
];

const NUCLEUS: &[&str] = &[
    "Nuclear body", "Nucleolus", "Nucleolus fibrillar center", "Nucleoplasm", "Nucleus",
    "Nucleus envelope", "Nucleus inner membrane", "Nucleus intermembrane space", "Nucleus lamina",
    "Nucleus matrix", "Nucleus membrane", "Nucleus outer membrane", "Nucleus speckle",
    "Centrosome", "Chromosome", "Spindle",
];

/// Immutable cluster → location-name membership table.
///
/// Sets are pairwise disjoint; construction fails otherwise.
#[derive(Debug, Clone)]
pub struct ClusterTable {
    members: BTreeMap<Cluster, BTreeSet<String>>,
    /// location name → owning cluster
    owner: BTreeMap<String, Cluster>,
}

impl ClusterTable {
    /// Build a table, rejecting overlapping memberships.
    pub fn new<I, L, S>(clusters: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Cluster, L)>,
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut members: BTreeMap<Cluster, BTreeSet<String>> = BTreeMap::new();
        let mut owner: BTreeMap<String, Cluster> = BTreeMap::new();

        for (cluster, names) in clusters {
            if cluster == Cluster::Unknown {
                return Err(ModalisError::Config(
                    "the Unknown cluster cannot have members".to_string(),
                ));
            }
            let set = members.entry(cluster).or_default();
            for name in names {
                let name = name.into();
                if let Some(&previous) = owner.get(&name) {
                    if previous != cluster {
                        return Err(ModalisError::Config(format!(
                            "location '{name}' is listed under both {previous} and {cluster}"
                        )));
                    }
                }
                owner.insert(name.clone(), cluster);
                set.insert(name);
            }
        }

        Ok(Self { members, owner })
    }

    /// The curated UniProt table used for drug-modality analysis.
    pub fn uniprot() -> Result<Self> {
        Self::new([
            (Cluster::Secreted, SECRETED),
            (Cluster::Surface, SURFACE),
            (Cluster::Cytoplasm, CYTOPLASM),
            (Cluster::Nucleus, NUCLEUS),
        ].map(|(cluster, names)| (cluster, names.iter().copied())))
    }

    /// Cluster of a canonical location name, `Unknown` if unlisted.
    pub fn cluster_of(&self, name: &str) -> Cluster {
        self.owner.get(name).copied().unwrap_or(Cluster::Unknown)
    }

    pub fn members(&self, cluster: Cluster) -> Option<&BTreeSet<String>> {
        self.members.get(&cluster)
    }

    /// Total number of listed location names.
    pub fn len(&self) -> usize { self.owner.len() }

    pub fn is_empty(&self) -> bool { self.owner.is_empty() }
}

// ── Resolver ──────────────────────────────────────────────────────────────────

/// Classifies locations against a vocabulary and a cluster table.
#[derive(Debug, Clone)]
pub struct ClusterResolver<'v> {
    vocabulary: &'v VocabularyRegistry,
    table: ClusterTable,
}

impl<'v> ClusterResolver<'v> {
    pub fn new(vocabulary: &'v VocabularyRegistry, table: ClusterTable) -> Self {
        tracing::debug!(
            "Cluster resolver ready: {} vocabulary entries, {} clustered locations",
            vocabulary.len(),
            table.len()
        );
        Self { vocabulary, table }
    }

    /// Resolver over the curated UniProt table.
    pub fn with_uniprot_table(vocabulary: &'v VocabularyRegistry) -> Result<Self> {
        Ok(Self::new(vocabulary, ClusterTable::uniprot()?))
    }

    /// Cluster of an SL code or location name. Never fails; anything
    /// outside the vocabulary or the table is `Unknown`.
    pub fn classify(&self, code_or_name: &str) -> Cluster {
        self.vocabulary
            .canonical_name(code_or_name)
            .map(|name| self.classify_name(name))
            .unwrap_or(Cluster::Unknown)
    }

    /// Table lookup for an already-canonical name.
    pub fn classify_name(&self, name: &str) -> Cluster {
        self.table.cluster_of(name)
    }

    /// Single representative cluster for one entity.
    /// See [`representative_cluster`].
    pub fn resolve_representative<I>(&self, observations: I) -> Result<Cluster>
    where
        I: IntoIterator<Item = (Cluster, usize)>,
    {
        representative_cluster(observations)
    }

    pub fn vocabulary(&self) -> &'v VocabularyRegistry { self.vocabulary }
}

/// Pick the cluster with the highest observation count; ties go to the
/// higher-priority cluster (Surface > Secreted > Nucleus > Cytoplasm > Unknown).
///
/// Repeated clusters are summed and zero counts ignored. Fails with
/// `InvalidInput` when nothing is left.
pub fn representative_cluster<I>(observations: I) -> Result<Cluster>
where
    I: IntoIterator<Item = (Cluster, usize)>,
{
    let mut totals: BTreeMap<Cluster, usize> = BTreeMap::new();
    for (cluster, count) in observations.into_iter().filter(|&(_, n)| n > 0) {
        let total = totals.entry(cluster).or_default();
        *total = total.saturating_add(count);
    }

    totals
        .into_iter()
        .max_by(|(ca, na), (cb, nb)| {
            na.cmp(nb)
                .then_with(|| cb.priority_rank().cmp(&ca.priority_rank()))
        })
        .map(|(cluster, _)| cluster)
        .ok_or_else(|| ModalisError::InvalidInput("empty cluster observation set".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> VocabularyRegistry {
        let text = "\
header line
ID   Nucleus.
AC   SL-0191
//
ID   Secreted.
AC   SL-0243
//
ID   Cell membrane.
AC   SL-0039
//
ID   Cytosol.
AC   SL-0091
//
ID   Cell tip.
AC   SL-0456
//
";
        VocabularyRegistry::from_flat_file(text).unwrap()
    }

    #[test]
    fn test_uniprot_table_sizes() {
        let t = ClusterTable::uniprot().unwrap();
        assert_eq!(t.members(Cluster::Secreted).unwrap().len(), 1);
        assert_eq!(t.members(Cluster::Surface).unwrap().len(), 9);
        assert_eq!(t.members(Cluster::Cytoplasm).unwrap().len(), 64);
        assert_eq!(t.members(Cluster::Nucleus).unwrap().len(), 16);
        assert_eq!(t.len(), 90);
    }

    #[test]
    fn test_overlap_is_config_error() {
        let err = ClusterTable::new([
            (Cluster::Surface, vec!["Cell membrane"]),
            (Cluster::Cytoplasm, vec!["Cytosol", "Cell membrane"]),
        ])
        .unwrap_err();
        match err {
            ModalisError::Config(msg) => {
                assert!(msg.contains("Cell membrane"));
                assert!(msg.contains("Surface"));
                assert!(msg.contains("Cytoplasm"));
            }
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_members_rejected() {
        let err = ClusterTable::new([(Cluster::Unknown, vec!["Cytosol"])]).unwrap_err();
        assert!(matches!(err, ModalisError::Config(_)));
    }

    #[test]
    fn test_classify_code_and_name() {
        let v = vocab();
        let r = ClusterResolver::with_uniprot_table(&v).unwrap();
        assert_eq!(r.classify("SL-0191"), Cluster::Nucleus);
        assert_eq!(r.classify("Nucleus"), Cluster::Nucleus);
        assert_eq!(r.classify("SL-0243"), Cluster::Secreted);
        assert_eq!(r.classify("SL-0039"), Cluster::Surface);
        assert_eq!(r.classify("Cytosol"), Cluster::Cytoplasm);
    }

    #[test]
    fn test_classify_unknown() {
        let v = vocab();
        let r = ClusterResolver::with_uniprot_table(&v).unwrap();
        assert_eq!(r.classify("not-a-real-code"), Cluster::Unknown);
        assert_eq!(r.classify(""), Cluster::Unknown);
        // In the vocabulary, not in any cluster.
        assert_eq!(r.classify("SL-0456"), Cluster::Unknown);
        // In the table, not in the vocabulary.
        assert_eq!(r.classify("Golgi apparatus"), Cluster::Unknown);
        assert_eq!(r.classify_name("Golgi apparatus"), Cluster::Cytoplasm);
    }

    #[test]
    fn test_surface_beats_cytoplasm_on_tie() {
        let c = representative_cluster([(Cluster::Surface, 3), (Cluster::Cytoplasm, 3)]).unwrap();
        assert_eq!(c, Cluster::Surface);
    }

    #[test]
    fn test_strict_max_wins() {
        let c = representative_cluster([(Cluster::Nucleus, 5), (Cluster::Cytoplasm, 2)]).unwrap();
        assert_eq!(c, Cluster::Nucleus);
        let c = representative_cluster([(Cluster::Surface, 1), (Cluster::Cytoplasm, 6)]).unwrap();
        assert_eq!(c, Cluster::Cytoplasm);
    }

    #[test]
    fn test_four_way_tie_resolves_to_surface() {
        let obs: BTreeMap<Cluster, usize> = Cluster::KNOWN.iter().map(|&c| (c, 2)).collect();
        assert_eq!(representative_cluster(obs).unwrap(), Cluster::Surface);
    }

    #[test]
    fn test_priority_order_pairwise() {
        for (i, &high) in Cluster::PRIORITY.iter().enumerate() {
            for &low in &Cluster::PRIORITY[i + 1..] {
                let c = representative_cluster([(low, 4), (high, 4)]).unwrap();
                assert_eq!(c, high, "{high} should outrank {low}");
            }
        }
    }

    #[test]
    fn test_secreted_beats_nucleus_beats_cytoplasm() {
        let c = representative_cluster([(Cluster::Nucleus, 1), (Cluster::Secreted, 1)]).unwrap();
        assert_eq!(c, Cluster::Secreted);
        let c = representative_cluster([(Cluster::Cytoplasm, 1), (Cluster::Nucleus, 1)]).unwrap();
        assert_eq!(c, Cluster::Nucleus);
    }

    #[test]
    fn test_repeated_clusters_summed_and_zeros_dropped() {
        let c = representative_cluster([
            (Cluster::Cytoplasm, 2),
            (Cluster::Surface, 3),
            (Cluster::Cytoplasm, 2),
        ])
        .unwrap();
        assert_eq!(c, Cluster::Cytoplasm);

        let c = representative_cluster([(Cluster::Surface, 0), (Cluster::Nucleus, 1)]).unwrap();
        assert_eq!(c, Cluster::Nucleus);
    }

    #[test]
    fn test_huge_counts_saturate() {
        let c = representative_cluster([
            (Cluster::Cytoplasm, usize::MAX),
            (Cluster::Cytoplasm, 7),
            (Cluster::Surface, usize::MAX),
        ])
        .unwrap();
        // Both totals pin at usize::MAX; the tie goes to Surface.
        assert_eq!(c, Cluster::Surface);
    }

    #[test]
    fn test_empty_observations_invalid() {
        let empty: Vec<(Cluster, usize)> = vec![];
        assert!(matches!(representative_cluster(empty), Err(ModalisError::InvalidInput(_))));
        assert!(matches!(
            representative_cluster([(Cluster::Surface, 0)]),
            Err(ModalisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_cluster_string_round_trip() {
        for c in Cluster::PRIORITY {
            assert_eq!(c.as_str().parse::<Cluster>().unwrap(), c);
        }
        assert!("Golgi".parse::<Cluster>().is_err());
    }
}
