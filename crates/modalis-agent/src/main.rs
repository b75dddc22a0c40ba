//! Modalis — drug modality vs target subcellular location distribution.
//! Entry point for the `modalis` binary.

mod cli;

use anyhow::Context;
use clap::Parser;
use modalis_common::Config;
use modalis_ingestion::pipeline::{self, StepOutcome};
use modalis_subcell::ClusterResolver;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("modalis=info,info")),
        )
        .init();

    let cli = Cli::parse();
    info!("Modalis v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    match cli.command {
        Command::DiscoverDrug => report(pipeline::run_drug_discovery(&config)?),
        Command::DiscoverMoa { mode } => report(pipeline::run_moa_discovery(&config, mode)?),
        Command::DiscoverTarget => {
            let vocabulary = pipeline::load_vocabulary(&config)?;
            let resolver = ClusterResolver::with_uniprot_table(&vocabulary)?;
            report(pipeline::run_target_discovery(&config, &resolver)?)
        }
        Command::Merge => report(pipeline::run_merge(&config)?),
        Command::Clusters => {
            let vocabulary = pipeline::load_vocabulary(&config)?;
            let resolver = ClusterResolver::with_uniprot_table(&vocabulary)?;
            report(pipeline::run_clusters(&config, &resolver)?)
        }
        Command::Run => {
            for outcome in pipeline::run_all(&config)? {
                report(outcome);
            }
        }
        Command::Translate { items } => {
            let vocabulary = pipeline::load_vocabulary(&config)?;
            for (item, out) in items.iter().zip(vocabulary.translate_all(&items)) {
                println!("{item}\t{}", out.as_deref().unwrap_or("-"));
            }
        }
        Command::Classify { items } => {
            let vocabulary = pipeline::load_vocabulary(&config)?;
            let resolver = ClusterResolver::with_uniprot_table(&vocabulary)?;
            for item in &items {
                println!("{item}\t{}", resolver.classify(item));
            }
        }
    }

    Ok(())
}

fn report(outcome: StepOutcome) {
    info!(
        "✅ {} rows written to {} (log: {})",
        outcome.rows,
        outcome.table.display(),
        outcome.log_file.display()
    );
}
