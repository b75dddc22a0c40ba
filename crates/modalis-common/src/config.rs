//! Configuration loading for Modalis.
//! Reads modalis.toml from the current directory or the path in the MODALIS_CONFIG env var.
//! Every section is optional; a missing file means "all defaults".

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModalisError, Result};

/// Env var that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "MODALIS_CONFIG";

/// Config file looked up in the working directory when the env var is unset.
pub const DEFAULT_CONFIG_FILE: &str = "modalis.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub datasets: DatasetsConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    #[serde(default)]
    pub moa: MoaConfig,
}

// ── Paths ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root of the raw JSON-lines dumps.
    #[serde(default = "default_datasets_dir")]
    pub datasets_dir: PathBuf,

    /// Where CSV tables and run logs are written.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// UniProt subcellular location flat file. Defaults to
    /// `<datasets_dir>/subcell_uniprot.txt`.
    #[serde(default)]
    pub vocabulary_file: Option<PathBuf>,
}

fn default_datasets_dir() -> PathBuf { PathBuf::from("./datasets") }
fn default_results_dir()  -> PathBuf { PathBuf::from("./results") }

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            datasets_dir: default_datasets_dir(),
            results_dir: default_results_dir(),
            vocabulary_file: None,
        }
    }
}

// ── Dataset sub-directories ───────────────────────────────────────────────────

/// Sub-directory names of each dump under `datasets_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetsConfig {
    #[serde(default = "default_molecule_dir")]
    pub molecule: String,
    #[serde(default = "default_moa_dir")]
    pub mechanism_of_action: String,
    #[serde(default = "default_targets_dir")]
    pub targets: String,
}

fn default_molecule_dir() -> String { "molecule".to_string() }
fn default_moa_dir()      -> String { "mechanismOfAction".to_string() }
fn default_targets_dir()  -> String { "targets".to_string() }

impl Default for DatasetsConfig {
    fn default() -> Self {
        Self {
            molecule: default_molecule_dir(),
            mechanism_of_action: default_moa_dir(),
            targets: default_targets_dir(),
        }
    }
}

// ── Vocabulary ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// Fixed number of header lines to skip. When unset the parser scans
    /// for the first `ID` record marker instead.
    #[serde(default)]
    pub header_lines: Option<usize>,
}

// ── Mechanism of action ───────────────────────────────────────────────────────

/// How many targets of a MoA record become drug–target rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoaMode {
    #[default]
    MultiTarget,
    SingleTarget,
}

impl fmt::Display for MoaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoaMode::MultiTarget => f.write_str("multi_target"),
            MoaMode::SingleTarget => f.write_str("single_target"),
        }
    }
}

impl FromStr for MoaMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "multi_target" => Ok(MoaMode::MultiTarget),
            "single_target" => Ok(MoaMode::SingleTarget),
            other => Err(format!(
                "unknown MoA mode '{other}' (expected multi_target or single_target)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoaConfig {
    #[serde(default)]
    pub mode: MoaMode,
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl Config {
    /// Load configuration from modalis.toml.
    /// Checks MODALIS_CONFIG env var first, then the current directory.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV_VAR)
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(Path::new(&path))
    }

    /// Load from an explicit path. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Configuration loaded from {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ModalisError::Config(e.to_string()))
    }

    /// Resolved path of the UniProt subcellular location file.
    pub fn vocabulary_path(&self) -> PathBuf {
        self.paths
            .vocabulary_file
            .clone()
            .unwrap_or_else(|| self.paths.datasets_dir.join("subcell_uniprot.txt"))
    }

    pub fn molecule_dir(&self) -> PathBuf {
        self.paths.datasets_dir.join(&self.datasets.molecule)
    }

    pub fn moa_dir(&self) -> PathBuf {
        self.paths.datasets_dir.join(&self.datasets.mechanism_of_action)
    }

    pub fn targets_dir(&self) -> PathBuf {
        self.paths.datasets_dir.join(&self.datasets.targets)
    }
}
