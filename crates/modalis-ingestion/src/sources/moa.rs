//! `mechanismOfAction` dump → drug–target table (`drugId, targetId`).
//!
//! A record lists one or two ChEMBL ids. With two, the first is kept
//! (usually the salt, with richer target data) and the second is an
//! alternative form whose rows are dropped from the final table.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use modalis_common::{MoaMode, Result};

use crate::jsonl::visit_records;
use crate::models::{MoaRecord, MoaRow};
use crate::report::RunReport;

#[derive(Debug, Default)]
pub struct MoaDiscovery {
    mode: MoaMode,
    raw_rows: Vec<MoaRow>,
    alternatives: Vec<String>,
    pub records: usize,
    pub zero_targets: usize,
    pub without_drug: usize,
    /// (drugs per record, targets per record) → records
    pub shape: BTreeMap<(usize, usize), usize>,
}

/// Final table plus what cleaning removed.
#[derive(Debug)]
pub struct MoaTable {
    pub rows: Vec<MoaRow>,
    pub duplicates_dropped: usize,
    pub alternative_rows_dropped: usize,
    pub alternative_forms: usize,
}

impl MoaDiscovery {
    pub fn new(mode: MoaMode) -> Self {
        Self { mode, ..Default::default() }
    }

    pub fn ingest(&mut self, record: MoaRecord) {
        self.records += 1;
        *self
            .shape
            .entry((record.chembl_ids.len(), record.targets.len()))
            .or_default() += 1;

        if record.chembl_ids.len() == 2 {
            let second = &record.chembl_ids[1];
            if !self.alternatives.contains(second) {
                self.alternatives.push(second.clone());
            }
        }

        let Some(drug_id) = record.chembl_ids.first() else {
            self.without_drug += 1;
            return;
        };

        if record.targets.is_empty() {
            self.zero_targets += 1;
            return;
        }

        let take = match self.mode {
            MoaMode::MultiTarget => record.targets.len(),
            MoaMode::SingleTarget => 1,
        };
        for target_id in record.targets.iter().take(take) {
            self.raw_rows.push(MoaRow { drug_id: drug_id.clone(), target_id: target_id.clone() });
        }
    }

    /// Deduplicate (first occurrence kept) and drop alternative forms.
    pub fn finish(&self) -> MoaTable {
        let mut seen = HashSet::new();
        let deduped: Vec<&MoaRow> = self.raw_rows.iter().filter(|row| seen.insert(*row)).collect();
        let duplicates_dropped = self.raw_rows.len() - deduped.len();

        let alternatives: HashSet<&str> = self.alternatives.iter().map(String::as_str).collect();
        let rows: Vec<MoaRow> = deduped
            .into_iter()
            .filter(|row| !alternatives.contains(row.drug_id.as_str()))
            .cloned()
            .collect();
        let alternative_rows_dropped = self.raw_rows.len() - duplicates_dropped - rows.len();

        MoaTable {
            rows,
            duplicates_dropped,
            alternative_rows_dropped,
            alternative_forms: self.alternatives.len(),
        }
    }

    pub fn report(&self, table: &MoaTable) -> RunReport {
        let mut report = RunReport::new("moa", format!("Running discovery on MOA dataset ({})", self.mode))
            .counter("items parsed", self.records)
            .counter("zero targets items", self.zero_targets)
            .counter("items without drug id", self.without_drug)
            .counter("alternative forms (unique)", table.alternative_forms)
            .counter("alternative forms items deleted", table.alternative_rows_dropped)
            .counter("duplicates deleted", table.duplicates_dropped)
            .counter("drug-target items saved", table.rows.len());
        for ((n_drugs, n_targets), n) in &self.shape {
            report = report.note(format!("{n} items with {n_drugs} drug ids and {n_targets} targets"));
        }
        report
    }
}

pub fn discover_moa(dir: &Path, mode: MoaMode) -> Result<MoaDiscovery> {
    let mut discovery = MoaDiscovery::new(mode);
    visit_records(dir, |record: MoaRecord| discovery.ingest(record))?;
    Ok(discovery)
}
