//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use modalis_common::MoaMode;

#[derive(Debug, Parser)]
#[command(name = "modalis", version, about = "Drug modality vs target subcellular location analysis")]
pub struct Cli {
    /// Path to modalis.toml (defaults to $MODALIS_CONFIG, then ./modalis.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Molecule dump → drug.csv
    DiscoverDrug,
    /// Mechanism-of-action dump → moa.csv
    DiscoverMoa {
        /// multi_target | single_target (overrides [moa] mode)
        #[arg(long)]
        mode: Option<MoaMode>,
    },
    /// Target dump → target.csv with location names and clusters
    DiscoverTarget,
    /// drug.csv ⋈ moa.csv ⋈ target.csv → merged.csv
    Merge,
    /// merged.csv → drug_clusters.csv (one representative cluster per drug)
    Clusters,
    /// All steps in order
    Run,
    /// Translate SL codes to names and names to codes
    Translate {
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// Print the cluster of SL codes or location names
    Classify {
        #[arg(required = true)]
        items: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_moa_mode() {
        let cli = Cli::try_parse_from(["modalis", "discover-moa", "--mode", "single_target"]).unwrap();
        match cli.command {
            Command::DiscoverMoa { mode } => assert_eq!(mode, Some(MoaMode::SingleTarget)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_bad_moa_mode_rejected() {
        assert!(Cli::try_parse_from(["modalis", "discover-moa", "--mode", "all"]).is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["modalis", "classify", "SL-0191", "--config", "/etc/modalis.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/modalis.toml")));
        match cli.command {
            Command::Classify { items } => assert_eq!(items, vec!["SL-0191"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_translate_requires_items() {
        assert!(Cli::try_parse_from(["modalis", "translate"]).is_err());
    }
}
