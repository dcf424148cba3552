//! Tab-separated output files
//!
//! Two files per run, named with the run date:
//!
//! - `<prefix>fighters_<YYYY-MM-DD>.tsv`: `id  weightClass  birthDate`
//! - `<prefix>fights_<YYYY-MM-DD>.tsv`:
//!   `fighterA  fighterB  result  method  round  time  date`
//!
//! Absent values are written as empty strings. Values are trimmed, and tabs
//! or line breaks inside a value are replaced by spaces.

use crate::output::traits::{OutputResult, RecordSink};
use crate::records::{FightRecord, FighterRecord};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Computes the fighter and fight file paths for a run
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fight_finder::output::output_paths;
///
/// let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
/// let (fighters, fights) = output_paths("data/ufc_", date);
/// assert_eq!(fighters.to_str(), Some("data/ufc_fighters_2020-01-01.tsv"));
/// assert_eq!(fights.to_str(), Some("data/ufc_fights_2020-01-01.tsv"));
/// ```
pub fn output_paths(prefix: &str, run_date: NaiveDate) -> (PathBuf, PathBuf) {
    let date = run_date.format("%Y-%m-%d");
    (
        PathBuf::from(format!("{}fighters_{}.tsv", prefix, date)),
        PathBuf::from(format!("{}fights_{}.tsv", prefix, date)),
    )
}

/// Formats one fighter line (without the trailing newline)
pub fn fighter_row(record: &FighterRecord) -> String {
    [
        clean(record.id.as_str()),
        clean(record.weight_class.as_deref().unwrap_or("")),
        clean(record.birth_date.as_deref().unwrap_or("")),
    ]
    .join("\t")
}

/// Formats one fight line (without the trailing newline)
pub fn fight_row(record: &FightRecord) -> String {
    [
        clean(record.fighter_a.as_str()),
        clean(record.fighter_b.as_str()),
        clean(&record.result),
        clean(&record.method),
        clean(&record.round),
        clean(&record.time),
        clean(&record.date),
    ]
    .join("\t")
}

fn clean(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect()
}

/// Sink writing the two dated TSV files
pub struct TsvSink {
    fighters: BufWriter<File>,
    fights: BufWriter<File>,
    fighters_path: PathBuf,
    fights_path: PathBuf,
}

impl TsvSink {
    /// Creates (truncating) both files for the given run date
    ///
    /// The directory part of `prefix` is created if it does not exist.
    pub fn create(prefix: &str, run_date: NaiveDate) -> OutputResult<Self> {
        let (fighters_path, fights_path) = output_paths(prefix, run_date);

        for path in [&fighters_path, &fights_path] {
            ensure_parent_dir(path)?;
        }

        tracing::debug!(
            "Writing fighters to {} and fights to {}",
            fighters_path.display(),
            fights_path.display()
        );

        Ok(Self {
            fighters: BufWriter::new(File::create(&fighters_path)?),
            fights: BufWriter::new(File::create(&fights_path)?),
            fighters_path,
            fights_path,
        })
    }

    /// Creates both files dated with today's local date
    pub fn create_today(prefix: &str) -> OutputResult<Self> {
        Self::create(prefix, chrono::Local::now().date_naive())
    }

    pub fn fighters_path(&self) -> &Path {
        &self.fighters_path
    }

    pub fn fights_path(&self) -> &Path {
        &self.fights_path
    }
}

fn ensure_parent_dir(path: &Path) -> OutputResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

impl RecordSink for TsvSink {
    fn record_fighter(&mut self, record: &FighterRecord) -> OutputResult<()> {
        writeln!(self.fighters, "{}", fighter_row(record))?;
        Ok(())
    }

    fn record_fight(&mut self, record: &FightRecord) -> OutputResult<()> {
        writeln!(self.fights, "{}", fight_row(record))?;
        Ok(())
    }

    fn finalize(&mut self) -> OutputResult<()> {
        self.fighters.flush()?;
        self.fights.flush()?;
        Ok(())
    }
}
