//! Pipeline steps.
//!
//! Each step reads its inputs from the configured directories, writes one
//! CSV table to `results_dir`, and publishes a run report:
//!
//! | step      | input                         | output              |
//! |-----------|-------------------------------|---------------------|
//! | drug      | `molecule/*.json`             | `drug.csv`          |
//! | moa       | `mechanismOfAction/*.json`    | `moa.csv`           |
//! | target    | `targets/*.json` + vocabulary | `target.csv`        |
//! | merge     | the three tables above        | `merged.csv`        |
//! | clusters  | `merged.csv` + vocabulary     | `drug_clusters.csv` |

use std::path::PathBuf;

use modalis_common::{Config, MoaMode, Result};
use modalis_subcell::{ClusterResolver, VocabularyOptions, VocabularyRegistry};
use tracing::info;

use crate::clusters::{clusters_report, ClusterRegistry};
use crate::merge::merge_tables;
use crate::models::{DrugRow, MergedRow, MoaRow, TargetLocationRow};
use crate::report::RunReport;
use crate::sources::{discover_drugs, discover_moa, discover_targets};
use crate::table::{read_csv, write_csv};

pub const DRUG_TABLE: &str = "drug.csv";
pub const MOA_TABLE: &str = "moa.csv";
pub const TARGET_TABLE: &str = "target.csv";
pub const MERGED_TABLE: &str = "merged.csv";
pub const DRUG_CLUSTERS_TABLE: &str = "drug_clusters.csv";

/// What a step produced.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub table: PathBuf,
    pub rows: usize,
    pub log_file: PathBuf,
}

/// Load the vocabulary named by the config.
pub fn load_vocabulary(config: &Config) -> Result<VocabularyRegistry> {
    let options = VocabularyOptions { header_lines: config.vocabulary.header_lines };
    VocabularyRegistry::from_path_with(config.vocabulary_path(), &options)
}

fn finish<T: serde::Serialize>(
    config: &Config,
    table_name: &str,
    rows: &[T],
    report: RunReport,
) -> Result<StepOutcome> {
    let results_dir = &config.paths.results_dir;
    let table = results_dir.join(table_name);
    write_csv(&table, rows)?;
    let log_file = report
        .note(format!("Resulting data in {}", table.display()))
        .publish(results_dir)?;
    Ok(StepOutcome { table, rows: rows.len(), log_file })
}

pub fn run_drug_discovery(config: &Config) -> Result<StepOutcome> {
    let dir = config.molecule_dir();
    info!("Running discovery on DRUG dataset in {:?}", dir);
    let discovery = discover_drugs(&dir)?;
    finish(config, DRUG_TABLE, &discovery.rows, discovery.report())
}

pub fn run_moa_discovery(config: &Config, mode: Option<MoaMode>) -> Result<StepOutcome> {
    let dir = config.moa_dir();
    let mode = mode.unwrap_or(config.moa.mode);
    info!("Running discovery on MOA dataset in {:?} ({})", dir, mode);
    let discovery = discover_moa(&dir, mode)?;
    let table = discovery.finish();
    finish(config, MOA_TABLE, &table.rows, discovery.report(&table))
}

pub fn run_target_discovery(config: &Config, resolver: &ClusterResolver<'_>) -> Result<StepOutcome> {
    let dir = config.targets_dir();
    info!("Running discovery on TARGET dataset in {:?}", dir);
    let discovery = discover_targets(&dir, resolver)?;

    let mut report = discovery.report();
    if !discovery.summary.not_standard.is_empty() {
        report = report.note(format!(
            "Non-standard locations: {}",
            discovery.summary.not_standard.join("; ")
        ));
    }
    finish(config, TARGET_TABLE, &discovery.rows, report)
}

pub fn run_merge(config: &Config) -> Result<StepOutcome> {
    let results_dir = &config.paths.results_dir;
    let drugs: Vec<DrugRow> = read_csv(&results_dir.join(DRUG_TABLE))?;
    let moa: Vec<MoaRow> = read_csv(&results_dir.join(MOA_TABLE))?;
    let targets: Vec<TargetLocationRow> = read_csv(&results_dir.join(TARGET_TABLE))?;

    let merged = merge_tables(&drugs, &moa, &targets);
    let report = RunReport::new("merge", "MERGED datasets to DMD")
        .counter("drugs", drugs.len())
        .counter("drug-target links", moa.len())
        .counter("target locations", targets.len())
        .counter("merged rows", merged.len());
    finish(config, MERGED_TABLE, &merged, report)
}

pub fn run_clusters(config: &Config, resolver: &ClusterResolver<'_>) -> Result<StepOutcome> {
    let merged: Vec<MergedRow> = read_csv(&config.paths.results_dir.join(MERGED_TABLE))?;
    let registry = ClusterRegistry::from_merged(&merged);
    let rows = registry.resolve(resolver)?;
    let report = clusters_report(&registry, &rows);
    finish(config, DRUG_CLUSTERS_TABLE, &rows, report)
}

/// All steps in order. Returns the outcomes in step order.
pub fn run_all(config: &Config) -> Result<Vec<StepOutcome>> {
    let vocabulary = load_vocabulary(config)?;
    let resolver = ClusterResolver::with_uniprot_table(&vocabulary)?;

    let outcomes = vec![
        run_drug_discovery(config)?,
        run_moa_discovery(config, None)?,
        run_target_discovery(config, &resolver)?,
        run_merge(config)?,
        run_clusters(config, &resolver)?,
    ];
    for outcome in &outcomes {
        info!("{} rows → {}", outcome.rows, outcome.table.display());
    }
    Ok(outcomes)
}
