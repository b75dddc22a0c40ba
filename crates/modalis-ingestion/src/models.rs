//! Data models for the ingestion pipeline.
//!
//! `*Record` types mirror one line of a JSON dump (unknown fields ignored);
//! `*Row` types are the CSV tables written to the results directory.

use modalis_subcell::Cluster;
use serde::{Deserialize, Serialize};

// ── Raw dump records ──────────────────────────────────────────────────────────

/// One line of the `molecule` dump.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub drug_type: Option<String>,
}

/// One line of the `mechanismOfAction` dump.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoaRecord {
    /// Usually one ChEMBL id; a second one is an alternative form (salt).
    #[serde(default)]
    pub chembl_ids: Vec<String>,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub mechanism_of_action: Option<String>,
}

/// One line of the `targets` dump.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRecord {
    pub id: String,
    #[serde(default)]
    pub biotype: Option<String>,
    #[serde(default)]
    pub subcellular_locations: Option<Vec<SubcellularLocation>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubcellularLocation {
    /// Free text, possibly isoform-qualified: "[Isoform p56]: Nucleus"
    #[serde(default)]
    pub location: Option<String>,
    /// Annotation source, e.g. "uniprot" or "HPA_main"
    #[serde(default)]
    pub source: Option<String>,
    /// UniProt SL accession, e.g. "SL-0191"
    #[serde(default, rename = "termSL")]
    pub term_sl: Option<String>,
}

// ── CSV rows ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugRow {
    pub drug_id: String,
    pub drug_name: String,
    pub drug_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoaRow {
    pub drug_id: String,
    pub target_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetLocationRow {
    pub target_id: String,
    /// SL code
    pub target_location: String,
    /// Canonical name; empty when the code is not in the vocabulary
    pub target_location_name: String,
    pub target_location_cluster: Cluster,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedRow {
    pub drug_id: String,
    pub drug_name: String,
    pub drug_type: String,
    pub target_id: String,
    pub target_location: String,
    pub target_location_name: String,
    pub target_location_cluster: Cluster,
}

/// One representative cluster per drug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugClusterRow {
    pub drug_id: String,
    pub drug_type: String,
    pub single_cluster: Cluster,
}
