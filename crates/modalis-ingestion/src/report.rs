//! Run reports.
//!
//! Every pipeline step ends with a summary block of named counters. The
//! block goes to the tracing log and to a timestamped file in the results
//! directory: `<job>_<MM-DD-YYYY--HH-MM-SS>.log`.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::Local;
use modalis_common::Result;

const BANNER_WIDTH: usize = 100;

#[derive(Debug, Clone)]
pub struct RunReport {
    job: String,
    headline: String,
    counters: Vec<(String, usize)>,
    notes: Vec<String>,
}

impl RunReport {
    pub fn new(job: &str, headline: impl Into<String>) -> Self {
        Self {
            job: job.to_string(),
            headline: headline.into(),
            counters: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn counter(mut self, label: &str, value: usize) -> Self {
        self.counters.push((label.to_string(), value));
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn job(&self) -> &str { &self.job }

    /// Value of a counter by label.
    pub fn get(&self, label: &str) -> Option<usize> {
        self.counters.iter().find(|(l, _)| l == label).map(|&(_, v)| v)
    }

    pub fn render(&self) -> String {
        let rule = "#".repeat(BANNER_WIDTH);
        let mut out = format!("\n{rule}\n\n{}\n\n{rule}\n\n", self.headline);
        for (label, value) in &self.counters {
            let _ = writeln!(out, "{} {label}", with_thousands(*value));
        }
        for note in &self.notes {
            let _ = writeln!(out, "{note}");
        }
        out
    }

    /// Emit through tracing and append to `<results_dir>/<job>_<timestamp>.log`.
    pub fn publish(&self, results_dir: &Path) -> Result<PathBuf> {
        tracing::info!("{}", self.render());

        std::fs::create_dir_all(results_dir)?;
        let file_name = format!("{}_{}.log", self.job, Local::now().format("%m-%d-%Y--%H-%M-%S"));
        let path = results_dir.join(file_name);
        let mut file = std::fs::OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(path)
    }
}

/// 1234567 → "1,234,567"
fn with_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
