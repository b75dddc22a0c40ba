//! `molecule` dump → drug table (`drugId, drugName, drugType`).

use std::collections::BTreeMap;
use std::path::Path;

use modalis_common::Result;

use crate::jsonl::visit_records;
use crate::models::{DrugRecord, DrugRow};
use crate::report::RunReport;

#[derive(Debug, Default)]
pub struct DrugDiscovery {
    pub rows: Vec<DrugRow>,
    pub records: usize,
    /// Ids of records lacking `name` or `drugType`.
    pub failed: Vec<String>,
    /// drugType → number of drugs
    pub modalities: BTreeMap<String, usize>,
}

impl DrugDiscovery {
    pub fn ingest(&mut self, record: DrugRecord) {
        self.records += 1;

        let (Some(name), Some(drug_type)) = (record.name, record.drug_type) else {
            tracing::debug!("Drug {} lacks name or drugType, skipping", record.id);
            self.failed.push(record.id);
            return;
        };

        let drug_type = if drug_type == "unknown" { "Unknown".to_string() } else { drug_type };
        *self.modalities.entry(drug_type.clone()).or_default() += 1;
        self.rows.push(DrugRow { drug_id: record.id, drug_name: name, drug_type });
    }

    pub fn report(&self) -> RunReport {
        let mut report = RunReport::new("drug", "Running discovery on DRUG dataset")
            .counter("items parsed", self.records)
            .counter("entities added", self.rows.len())
            .counter("failed", self.failed.len());
        for (modality, n) in &self.modalities {
            report = report.note(format!("{modality}: {n}"));
        }
        report
    }
}

pub fn discover_drugs(dir: &Path) -> Result<DrugDiscovery> {
    let mut discovery = DrugDiscovery::default();
    visit_records(dir, |record: DrugRecord| discovery.ingest(record))?;
    Ok(discovery)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: Option<&str>, drug_type: Option<&str>) -> DrugRecord {
        DrugRecord {
            id: id.to_string(),
            name: name.map(str::to_string),
            drug_type: drug_type.map(str::to_string),
        }
    }

    #[test]
    fn test_complete_records_become_rows() {
        let mut d = DrugDiscovery::default();
        d.ingest(record("CHEMBL1201580", Some("TRASTUZUMAB"), Some("Antibody")));
        d.ingest(record("CHEMBL25", Some("ASPIRIN"), Some("Small molecule")));
        assert_eq!(d.rows.len(), 2);
        assert_eq!(d.rows[0].drug_type, "Antibody");
        assert_eq!(d.modalities["Small molecule"], 1);
    }

    #[test]
    fn test_lowercase_unknown_normalised() {
        let mut d = DrugDiscovery::default();
        d.ingest(record("CHEMBL1", Some("X"), Some("unknown")));
        assert_eq!(d.rows[0].drug_type, "Unknown");
    }

    #[test]
    fn test_missing_fields_counted_as_failed() {
        let mut d = DrugDiscovery::default();
        d.ingest(record("CHEMBL2", None, Some("Protein")));
        d.ingest(record("CHEMBL3", Some("Y"), None));
        assert!(d.rows.is_empty());
        assert_eq!(d.failed, vec!["CHEMBL2", "CHEMBL3"]);
        assert_eq!(d.report().get("failed"), Some(2));
        assert_eq!(d.report().get("items parsed"), Some(2));
    }
}
