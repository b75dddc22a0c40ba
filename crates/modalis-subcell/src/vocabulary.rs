//! UniProt subcellular location vocabulary.
//!
//! Parses the controlled-vocabulary flat file distributed by UniProt
//! (`subcell.txt`) and builds an in-memory registry mapping SL codes
//! (e.g. "SL-0191") to canonical location names (e.g. "Nucleus") and back.
//!
//! File layout:
//! ```text
//! <license / release header>
//! ID   Nucleus.
//! AC   SL-0191
//! DE   The nucleus is the most obvious organelle in any eukaryotic cell.
//! DE   It is a membrane-bound organelle ...
//! //
//! IT   Single-pass membrane protein.      <- topology block, not a location
//! ...
//! //
//! ```
//! Build once at the start of a run; the registry is immutable afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use modalis_common::{ModalisError, Result};
use serde::{Deserialize, Serialize};

/// Start of a location record.
const RECORD_MARKER: &str = "ID   ";
/// Line closing every block.
const BLOCK_TERMINATOR: &str = "//";
const ID_TAG: &str = "ID";
const CODE_TAG: &str = "AC";

/// One location record of the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// Canonical location name, e.g. "Cell membrane"
    pub name: String,
    /// Raw two-character tagged fields (AC, DE, SY, GO, HI, ...).
    /// Continuation lines are concatenated without separator.
    pub fields: BTreeMap<String, String>,
}

impl VocabularyEntry {
    /// SL accession from the `AC` field, if present.
    pub fn code(&self) -> Option<&str> {
        self.field(CODE_TAG).filter(|c| !c.is_empty())
    }

    pub fn field(&self, tag: &str) -> Option<&str> {
        self.fields.get(tag).map(String::as_str)
    }
}

/// Result of a code/name lookup, tagged with what the input was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Translation<'a> {
    /// Input was a code; carries its name.
    Name(&'a str),
    /// Input was a name; carries its code.
    Code(&'a str),
}

impl<'a> Translation<'a> {
    pub fn as_str(&self) -> &'a str {
        match *self {
            Translation::Name(s) | Translation::Code(s) => s,
        }
    }
}

/// Parser knobs.
#[derive(Debug, Clone, Default)]
pub struct VocabularyOptions {
    /// Skip exactly this many header lines instead of scanning for the
    /// first `ID` record. Only useful when pinned to one file release.
    pub header_lines: Option<usize>,
}

/// In-memory code ↔ name registry.
/// Build once at startup; share by reference.
#[derive(Debug, Clone)]
pub struct VocabularyRegistry {
    entries: Vec<VocabularyEntry>,
    /// name → index into `entries`
    by_name: BTreeMap<String, usize>,
    code_to_name: BTreeMap<String, String>,
    name_to_code: BTreeMap<String, String>,
    n_discarded: usize,
    n_without_code: usize,
    n_integrity_warnings: usize,
}

impl VocabularyRegistry {
    // ── Constructors ──────────────────────────────────────────────────────────

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_path_with(path, &VocabularyOptions::default())
    }

    pub fn from_path_with(path: impl AsRef<Path>, options: &VocabularyOptions) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Loading UniProt subcellular vocabulary from {:?}", path);
        let text = std::fs::read_to_string(path).map_err(|e| {
            ModalisError::Io(std::io::Error::new(e.kind(), format!("{}: {e}", path.display())))
        })?;
        Self::from_flat_file_with(&text, options)
    }

    /// Build from the file contents (for testing / embedded vocabularies).
    pub fn from_flat_file(text: &str) -> Result<Self> {
        Self::from_flat_file_with(text, &VocabularyOptions::default())
    }

    pub fn from_flat_file_with(text: &str, options: &VocabularyOptions) -> Result<Self> {
        let lines = record_lines(text, options)?;

        let mut entries = Vec::new();
        let mut n_discarded = 0usize;
        let mut block: Vec<&str> = Vec::new();

        for line in lines {
            if line.trim_end() != BLOCK_TERMINATOR {
                block.push(line);
                continue;
            }
            match parse_block(&block) {
                Some(entry) => entries.push(entry),
                None => n_discarded += 1,
            }
            block.clear();
        }

        if block.iter().any(|l| !l.trim().is_empty()) {
            tracing::debug!("Dropping unterminated trailing block ({} lines)", block.len());
        }

        Ok(Self::from_entries(entries, n_discarded))
    }

    fn from_entries(parsed: Vec<VocabularyEntry>, n_discarded: usize) -> Self {
        let mut entries = Vec::with_capacity(parsed.len());
        let mut by_name: BTreeMap<String, usize> = BTreeMap::new();
        let mut code_to_name: BTreeMap<String, String> = BTreeMap::new();
        let mut name_to_code: BTreeMap<String, String> = BTreeMap::new();
        let mut n_without_code = 0usize;
        let mut n_integrity_warnings = 0usize;

        for entry in parsed {
            if by_name.contains_key(&entry.name) {
                tracing::warn!("Duplicate vocabulary name '{}', keeping first entry", entry.name);
                n_integrity_warnings += 1;
                continue;
            }

            match entry.code() {
                None => {
                    tracing::warn!("Vocabulary entry '{}' has no AC field", entry.name);
                    n_without_code += 1;
                }
                Some(code) if code_to_name.contains_key(code) => {
                    tracing::warn!(
                        "Code {} claimed by both '{}' and '{}', keeping first",
                        code, code_to_name[code], entry.name
                    );
                    n_integrity_warnings += 1;
                }
                Some(code) => {
                    code_to_name.insert(code.to_string(), entry.name.clone());
                    name_to_code.insert(entry.name.clone(), code.to_string());
                }
            }

            by_name.insert(entry.name.clone(), entries.len());
            entries.push(entry);
        }

        tracing::info!(
            "UniProt SL vocabulary built: {} entries, {} codes, {} blocks discarded",
            entries.len(), code_to_name.len(), n_discarded
        );

        Self {
            entries,
            by_name,
            code_to_name,
            name_to_code,
            n_discarded,
            n_without_code,
            n_integrity_warnings,
        }
    }

    // ── Translation ───────────────────────────────────────────────────────────

    /// `{code: name}` for every entry carrying an `AC` field.
    pub fn code_name_mapping(&self) -> &BTreeMap<String, String> {
        &self.code_to_name
    }

    /// `{name: code}`, the inverse of [`Self::code_name_mapping`].
    pub fn name_code_mapping(&self) -> &BTreeMap<String, String> {
        &self.name_to_code
    }

    /// Tagged lookup. Codes are tried before names.
    pub fn lookup(&self, item: &str) -> Option<Translation<'_>> {
        if let Some(name) = self.code_to_name.get(item) {
            return Some(Translation::Name(name.as_str()));
        }
        self.name_to_code.get(item).map(|code| Translation::Code(code.as_str()))
    }

    /// Code → name or name → code. `None` when the item is neither.
    pub fn translate(&self, item: &str) -> Option<String> {
        self.lookup(item).map(|t| t.as_str().to_string())
    }

    pub fn translate_all<S: AsRef<str>>(&self, items: &[S]) -> Vec<Option<String>> {
        items.iter().map(|item| self.translate(item.as_ref())).collect()
    }

    /// Canonical location name for a code or a name.
    pub fn canonical_name(&self, item: &str) -> Option<&str> {
        if let Some(name) = self.code_to_name.get(item) {
            return Some(name.as_str());
        }
        self.by_name.get_key_value(item).map(|(name, _)| name.as_str())
    }

    /// True when `name` is a coded location name.
    pub fn is_known_name(&self, name: &str) -> bool {
        self.name_to_code.contains_key(name)
    }

    /// Strict code access: fails when the entry is absent or lacks `AC`.
    pub fn code_of_entry(&self, name: &str) -> Result<&str> {
        let entry = self
            .entry(name)
            .ok_or_else(|| ModalisError::Parse(format!("no vocabulary entry named '{name}'")))?;
        entry
            .code()
            .ok_or_else(|| ModalisError::Parse(format!("vocabulary entry '{name}' has no AC field")))
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn entry(&self, name: &str) -> Option<&VocabularyEntry> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    /// Entries in file order.
    pub fn entries(&self) -> &[VocabularyEntry] { &self.entries }

    /// Known names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Terminated blocks that were not location records.
    pub fn n_discarded_blocks(&self) -> usize { self.n_discarded }

    pub fn n_without_code(&self) -> usize { self.n_without_code }

    /// Duplicate names or codes seen while building.
    pub fn integrity_warnings(&self) -> usize { self.n_integrity_warnings }
}

/// Lines after the header.
fn record_lines<'t>(text: &'t str, options: &VocabularyOptions) -> Result<Vec<&'t str>> {
    let lines: Vec<&str> = text.lines().collect();
    let start = match options.header_lines {
        Some(n) => n.min(lines.len()),
        None => lines
            .iter()
            .position(|l| l.starts_with(RECORD_MARKER))
            .ok_or_else(|| {
                ModalisError::Parse(
                    "no 'ID' record marker found; not a UniProt subcellular location file".to_string(),
                )
            })?,
    };
    Ok(lines[start..].to_vec())
}

fn parse_block(block: &[&str]) -> Option<VocabularyEntry> {
    let mut rows = block.iter().copied().skip_while(|l| l.trim().is_empty());
    let first = rows.next()?;

    if !first.starts_with(ID_TAG) {
        tracing::debug!("Skipping non-location block starting with {:?}", first);
        return None;
    }

    let name = first[ID_TAG.len()..].split('.').next().unwrap_or("").trim();
    if name.is_empty() {
        tracing::warn!("Skipping location block with empty ID line");
        return None;
    }

    let mut fields: BTreeMap<String, String> = BTreeMap::new();
    for row in rows.filter(|r| !r.trim().is_empty()) {
        let (tag, rest) = split_tag(row);
        fields.entry(tag.to_string()).or_default().push_str(rest.trim());
    }

    Some(VocabularyEntry { name: name.to_string(), fields })
}

/// Two-character tag, rest of line.
fn split_tag(row: &str) -> (&str, &str) {
    let cut = row.char_indices().nth(2).map(|(i, _)| i).unwrap_or(row.len());
    row.split_at(cut)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
