//! `targets` dump → target location table
//! (`targetId, targetLocation, targetLocationName, targetLocationCluster`).
//!
//! Per target:
//!   1. Free-text locations are isoform-stripped and checked against the
//!      vocabulary; names outside it are collected as "not standard".
//!   2. UniProt-sourced annotations give SL codes (`termSL`); when the code
//!      is missing the stripped location name is translated to one.
//!   3. Codes are deduplicated and each becomes one row, named and
//!      clustered through the subcellular resolver.
//!
//! Misses never abort the run; they are tallied into the summary.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use modalis_common::Result;
use modalis_subcell::{ClusterResolver, Translation};

use crate::jsonl::visit_records;
use crate::models::{SubcellularLocation, TargetLocationRow, TargetRecord};
use crate::report::RunReport;

const UNIPROT_SOURCE: &str = "uniprot";

#[derive(Debug, Default)]
pub struct TargetSummary {
    pub records: usize,
    /// UniProt annotations without a `termSL` code
    pub locs_without_sl_code: usize,
    pub zero_locations: usize,
    pub targets_with_locations: usize,
    pub location_rows: usize,
    /// Distinct location strings outside the vocabulary, first-seen order
    pub not_standard: Vec<String>,
    pub zero_location_biotypes: BTreeMap<String, usize>,
    pub located_biotypes: BTreeMap<String, usize>,
    /// annotations per target → targets
    pub locations_per_target: BTreeMap<usize, usize>,
    /// location name (or raw code if unnamed) → rows
    pub location_names: BTreeMap<String, usize>,
}

#[derive(Debug, Default)]
pub struct TargetDiscovery {
    pub rows: Vec<TargetLocationRow>,
    pub summary: TargetSummary,
    not_standard_seen: HashSet<String>,
}

/// Drop isoform/variant qualifiers: "[Isoform p56]: Nucleus" → "Nucleus".
pub fn strip_isoform(location: &str) -> &str {
    location.rsplit(':').next().unwrap_or(location).trim()
}

impl TargetDiscovery {
    pub fn ingest(&mut self, record: TargetRecord, resolver: &ClusterResolver<'_>) {
        let vocabulary = resolver.vocabulary();
        let summary = &mut self.summary;
        summary.records += 1;

        let biotype = record.biotype.unwrap_or_default();
        let locations = record.subcellular_locations.unwrap_or_default();

        if locations.is_empty() {
            summary.zero_locations += 1;
            *summary.zero_location_biotypes.entry(biotype).or_default() += 1;
            return;
        }
        *summary.located_biotypes.entry(biotype).or_default() += 1;
        *summary.locations_per_target.entry(locations.len()).or_default() += 1;

        for name in locations.iter().filter_map(location_text) {
            if !vocabulary.is_known_name(name) {
                self.note_not_standard(name);
            }
        }

        let mut codes: Vec<String> = Vec::new();
        for item in locations.iter().filter(|l| l.source.as_deref() == Some(UNIPROT_SOURCE)) {
            if let Some(code) = item.term_sl.as_deref().filter(|c| !c.is_empty()) {
                push_unique(&mut codes, code);
                continue;
            }

            self.summary.locs_without_sl_code += 1;
            let Some(name) = location_text(item) else { continue };
            match vocabulary.lookup(name) {
                Some(Translation::Code(code)) => {
                    tracing::debug!("{}: SL code {} recovered from location '{}'", record.id, code, name);
                    push_unique(&mut codes, code);
                }
                _ => self.note_not_standard(name),
            }
        }

        if codes.is_empty() {
            return;
        }
        self.summary.targets_with_locations += 1;

        for code in codes {
            let name = vocabulary.translate(&code).unwrap_or_default();
            let cluster = resolver.classify(&code);
            let key = if name.is_empty() { code.clone() } else { name.clone() };
            *self.summary.location_names.entry(key).or_default() += 1;
            self.summary.location_rows += 1;
            self.rows.push(TargetLocationRow {
                target_id: record.id.clone(),
                target_location: code,
                target_location_name: name,
                target_location_cluster: cluster,
            });
        }
    }

    fn note_not_standard(&mut self, name: &str) {
        if self.not_standard_seen.insert(name.to_string()) {
            self.summary.not_standard.push(name.to_string());
        }
    }

    pub fn report(&self) -> RunReport {
        let s = &self.summary;
        let mut report = RunReport::new("target", "Running discovery on TARGET dataset")
            .counter("total", s.records)
            .counter("locations subitems have no SL UniProt code", s.locs_without_sl_code)
            .counter("zero locations", s.zero_locations)
            .counter("targets with locations", s.targets_with_locations)
            .counter("locations including multiple", s.location_rows)
            .counter("non-standard location names", s.not_standard.len());

        report = report.note(format!("Zero locations by biotype: {}", tally(&s.zero_location_biotypes)));
        report = report.note(format!("Located targets by biotype: {}", tally(&s.located_biotypes)));
        for (n_locations, n_targets) in &s.locations_per_target {
            report = report.note(format!("{n_targets} targets with {n_locations} location annotations"));
        }
        for (name, n) in &s.location_names {
            report = report.note(format!("location {name}: {n}"));
        }
        report
    }
}

/// Non-empty, isoform-stripped location text.
fn location_text(item: &SubcellularLocation) -> Option<&str> {
    item.location.as_deref().map(strip_isoform).filter(|s| !s.is_empty())
}

/// "a: 1, b: 2"
fn tally(counts: &BTreeMap<String, usize>) -> String {
    let parts: Vec<String> = counts.iter().map(|(k, n)| format!("{k}: {n}")).collect();
    parts.join(", ")
}

fn push_unique(codes: &mut Vec<String>, code: &str) {
    if !codes.iter().any(|c| c == code) {
        codes.push(code.to_string());
    }
}

pub fn discover_targets(dir: &Path, resolver: &ClusterResolver<'_>) -> Result<TargetDiscovery> {
    let mut discovery = TargetDiscovery::default();
    visit_records(dir, |record: TargetRecord| discovery.ingest(record, resolver))?;
    tracing::info!(
        "Target discovery: {} records, {} location rows, {} non-standard names",
        discovery.summary.records,
        discovery.summary.location_rows,
        discovery.summary.not_standard.len()
    );
    Ok(discovery)
}
