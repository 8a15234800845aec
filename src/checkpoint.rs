//! Best-schedule persistence.
//!
//! The search keeps exactly one durable record per team count: the best
//! schedule ever found and its distance. The on-disk format is plain
//! text so a human can read the result directly:
//!
//! ```text
//! Distance:
//! 8276
//!
//! Matrix:
//!  2 -3  4 -2  3 -4
//! -1  4 -3  1 -4  3
//! ...
//!
//! Schedule:
//! | ATL  | NYM  | PHI  | MON  |
//! ...
//! ```
//!
//! Only `Distance:` and the `Matrix:` block are read back; the `Schedule:`
//! table is derived output.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{TtpError, TtpResult};
use crate::evaluation::total_distance;
use crate::models::{BestRecord, ProblemInstance, Schedule};
use crate::render::{markdown_table, matrix_text};
use crate::validation::validate_schedule;

/// Storage for the best-known schedule of an instance.
pub trait CheckpointStore {
    /// Loads the stored record, or `None` if nothing has been stored yet.
    ///
    /// # Errors
    /// `MalformedCheckpoint` if a record exists but cannot be trusted.
    fn load(&self, instance: &ProblemInstance) -> TtpResult<Option<BestRecord>>;

    /// Replaces the stored record.
    fn save(&mut self, record: &BestRecord, instance: &ProblemInstance) -> TtpResult<()>;
}

/// One text file per team count under a directory.
#[derive(Debug, Clone)]
pub struct FileCheckpointStore {
    dir: PathBuf,
}

impl FileCheckpointStore {
    /// Stores checkpoints under `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<dir>/<teams> teams.txt`.
    pub fn path_for(&self, teams: usize) -> PathBuf {
        self.dir.join(format!("{teams} teams.txt"))
    }
}

impl CheckpointStore for FileCheckpointStore {
    fn load(&self, instance: &ProblemInstance) -> TtpResult<Option<BestRecord>> {
        let path = self.path_for(instance.teams());
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no checkpoint");
                return Ok(None);
            }
            Err(e) => return Err(TtpError::io(&path, e)),
        };
        parse_checkpoint(&text, instance, &path).map(Some)
    }

    /// Writes `<teams> teams.txt.tmp` and renames it over the checkpoint, so
    /// an interrupted save leaves the previous file intact.
    fn save(&mut self, record: &BestRecord, instance: &ProblemInstance) -> TtpResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| TtpError::io(&self.dir, e))?;
        let path = self.path_for(instance.teams());
        let tmp = temp_path(&path);
        fs::write(&tmp, format_checkpoint(record, instance))
            .map_err(|e| TtpError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| TtpError::io(&path, e))?;
        debug!(path = %path.display(), distance = record.distance, "checkpoint saved");
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// In-memory store. Counts saves so callers can check persistence behaviour.
#[derive(Debug, Clone, Default)]
pub struct MemoryCheckpointStore {
    record: Option<BestRecord>,
    saves: usize,
}

impl MemoryCheckpointStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `record`.
    pub fn with_record(record: BestRecord) -> Self {
        Self {
            record: Some(record),
            saves: 0,
        }
    }

    /// The stored record.
    pub fn record(&self) -> Option<&BestRecord> {
        self.record.as_ref()
    }

    /// Number of `save` calls.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn load(&self, _instance: &ProblemInstance) -> TtpResult<Option<BestRecord>> {
        Ok(self.record.clone())
    }

    fn save(&mut self, record: &BestRecord, _instance: &ProblemInstance) -> TtpResult<()> {
        self.record = Some(record.clone());
        self.saves += 1;
        Ok(())
    }
}

/// Renders a record in checkpoint file format.
pub fn format_checkpoint(record: &BestRecord, instance: &ProblemInstance) -> String {
    format!(
        "Distance:\n{}\n\nMatrix:\n{}\n\nSchedule:\n{}\n",
        record.distance,
        matrix_text(&record.schedule),
        markdown_table(&record.schedule, instance)
    )
}

/// Parses checkpoint text and checks it against `instance`.
///
/// The schedule must have the instance's team count and pass
/// [`validate_schedule`]. When the stored distance disagrees with the
/// recomputed one, the recomputed value wins.
pub fn parse_checkpoint(
    text: &str,
    instance: &ProblemInstance,
    path: &Path,
) -> TtpResult<BestRecord> {
    let mut lines = text.lines().map(str::trim);

    if !lines.by_ref().any(|l| l == "Distance:") {
        return Err(TtpError::malformed(path, "missing 'Distance:' section"));
    }
    let stored: u64 = lines
        .by_ref()
        .find(|l| !l.is_empty())
        .ok_or_else(|| TtpError::malformed(path, "missing distance value"))?
        .parse()
        .map_err(|_| TtpError::malformed(path, "distance is not a non-negative integer"))?;

    if !lines.by_ref().any(|l| l == "Matrix:") {
        return Err(TtpError::malformed(path, "missing 'Matrix:' section"));
    }
    let mut rows = Vec::new();
    for line in lines.take_while(|l| !l.is_empty() && *l != "Schedule:") {
        let row = line
            .split_whitespace()
            .map(str::parse::<i32>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| TtpError::malformed(path, format!("bad matrix row '{line}'")))?;
        rows.push(row);
    }

    if rows.len() != instance.teams() {
        return Err(TtpError::malformed(
            path,
            format!("matrix has {} rows, expected {}", rows.len(), instance.teams()),
        ));
    }
    let schedule =
        Schedule::from_rows(rows).map_err(|e| TtpError::malformed(path, e.to_string()))?;
    validate_schedule(&schedule).map_err(|errors| {
        TtpError::malformed(path, TtpError::InvalidSchedule(errors).to_string())
    })?;

    let distance = total_distance(&schedule, instance.distances());
    if distance != stored {
        warn!(
            path = %path.display(),
            stored,
            recomputed = distance,
            "checkpoint distance does not match its schedule; using recomputed value"
        );
    }
    Ok(BestRecord { schedule, distance })
}
