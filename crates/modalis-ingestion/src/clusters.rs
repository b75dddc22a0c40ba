//! Per-drug cluster registry.
//!
//! A drug hitting several targets, each with several locations, ends up
//! with a multiset of clusters, e.g.
//! `CHEMBL4594472: [(Cytoplasm, 6), (Nucleus, 4), (Surface, 3), (Secreted, 2)]`.
//! The registry reduces that to one representative cluster per drug and
//! tallies the result against drug modality.

use std::collections::{BTreeMap, HashMap};

use modalis_common::Result;
use modalis_subcell::{Cluster, ClusterResolver};

use crate::models::{DrugClusterRow, MergedRow};
use crate::report::RunReport;

/// Observation counts for one drug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrugObservations {
    pub drug_id: String,
    pub drug_type: String,
    /// Clusters in first-seen order with row counts.
    pub clusters: Vec<(Cluster, usize)>,
    /// Rows carrying a location name.
    pub locations: usize,
}

impl DrugObservations {
    /// Hits more than one named location ("ML" as opposed to "SL").
    pub fn is_multi_location(&self) -> bool {
        self.locations > 1
    }
}

#[derive(Debug, Default)]
pub struct ClusterRegistry {
    drugs: Vec<DrugObservations>,
    /// cluster → drug modality → rows, before reduction
    unreduced: BTreeMap<Cluster, BTreeMap<String, usize>>,
}

impl ClusterRegistry {
    /// Group merged rows by drug and count rows per cluster.
    pub fn from_merged(rows: &[MergedRow]) -> Self {
        let mut drugs: Vec<DrugObservations> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut unreduced: BTreeMap<Cluster, BTreeMap<String, usize>> = BTreeMap::new();

        for row in rows {
            let i = *index.entry(row.drug_id.as_str()).or_insert_with(|| {
                drugs.push(DrugObservations {
                    drug_id: row.drug_id.clone(),
                    drug_type: row.drug_type.clone(),
                    clusters: Vec::new(),
                    locations: 0,
                });
                drugs.len() - 1
            });

            let drug = &mut drugs[i];
            if !row.target_location_name.is_empty() {
                drug.locations += 1;
            }
            match drug.clusters.iter_mut().find(|(c, _)| *c == row.target_location_cluster) {
                Some((_, n)) => *n += 1,
                None => drug.clusters.push((row.target_location_cluster, 1)),
            }

            *unreduced
                .entry(row.target_location_cluster)
                .or_default()
                .entry(row.drug_type.clone())
                .or_default() += 1;
        }

        Self { drugs, unreduced }
    }

    pub fn drugs(&self) -> &[DrugObservations] { &self.drugs }

    pub fn len(&self) -> usize { self.drugs.len() }

    pub fn is_empty(&self) -> bool { self.drugs.is_empty() }

    /// Drug–cluster pairs per cluster (each drug counted once per cluster it touches).
    pub fn reduced_distribution(&self) -> BTreeMap<Cluster, usize> {
        let mut out = BTreeMap::new();
        for drug in &self.drugs {
            for &(cluster, _) in &drug.clusters {
                *out.entry(cluster).or_default() += 1;
            }
        }
        out
    }

    /// Cluster × drug modality over every merged row.
    pub fn unreduced_distribution(&self) -> &BTreeMap<Cluster, BTreeMap<String, usize>> {
        &self.unreduced
    }

    /// location count → drugs
    pub fn locations_per_drug(&self) -> BTreeMap<usize, usize> {
        let mut out = BTreeMap::new();
        for drug in &self.drugs {
            *out.entry(drug.locations).or_default() += 1;
        }
        out
    }

    pub fn multi_location_drugs(&self) -> usize {
        self.drugs.iter().filter(|d| d.is_multi_location()).count()
    }

    /// Drugs spanning more than one cluster.
    pub fn multi_cluster_drugs(&self) -> usize {
        self.drugs.iter().filter(|d| d.clusters.len() > 1).count()
    }

    /// One representative cluster per drug.
    pub fn resolve(&self, resolver: &ClusterResolver<'_>) -> Result<Vec<DrugClusterRow>> {
        self.drugs
            .iter()
            .map(|drug| {
                let single_cluster = resolver.resolve_representative(drug.clusters.iter().copied())?;
                Ok(DrugClusterRow {
                    drug_id: drug.drug_id.clone(),
                    drug_type: drug.drug_type.clone(),
                    single_cluster,
                })
            })
            .collect()
    }
}

/// representative cluster → drug modality → drugs
pub fn modality_distribution(rows: &[DrugClusterRow]) -> BTreeMap<Cluster, BTreeMap<String, usize>> {
    let mut out: BTreeMap<Cluster, BTreeMap<String, usize>> = BTreeMap::new();
    for row in rows {
        *out.entry(row.single_cluster)
            .or_default()
            .entry(row.drug_type.clone())
            .or_default() += 1;
    }
    out
}

pub fn clusters_report(registry: &ClusterRegistry, rows: &[DrugClusterRow]) -> RunReport {
    let mut report = RunReport::new("clusters", "Representative cluster per drug")
        .counter("drugs", registry.len())
        .counter("drugs spanning several clusters", registry.multi_cluster_drugs())
        .counter("drugs with multiple locations (ML)", registry.multi_location_drugs())
        .counter(
            "drugs with a single location (SL)",
            registry.len() - registry.multi_location_drugs(),
        );

    for (cluster, n) in registry.reduced_distribution() {
        report = report.counter(&format!("drug-cluster pairs in {cluster}"), n);
    }
    for (locations, n) in registry.locations_per_drug() {
        report = report.note(format!("{n} drugs with {locations} locations"));
    }
    for (cluster, modalities) in registry.unreduced_distribution() {
        report = report.note(format!("{cluster} (all rows) | {}", tally(modalities)));
    }
    for (cluster, modalities) in modality_distribution(rows) {
        report = report.note(format!("{cluster} | {}", tally(&modalities)));
    }
    report
}

fn tally(modalities: &BTreeMap<String, usize>) -> String {
    let parts: Vec<String> = modalities.iter().map(|(m, n)| format!("{m}: {n}")).collect();
    parts.join(", ")
}
