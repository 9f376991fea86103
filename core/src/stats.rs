use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::{GameKind, StatsError};

/// Shown instead of a summary when nothing has been recorded yet.
pub const NO_STATS_MESSAGE: &str = "No stats available. Play some games first!";

/// Aggregate play history shared by every game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRecord {
    #[serde(rename = "Games Played")]
    pub games_played: u64,
    #[serde(rename = "Highest Scores")]
    pub highest_scores: BTreeMap<String, i64>,
    /// Carried through the file untouched, nothing derives it.
    #[serde(rename = "Favorite Game")]
    pub favorite_game: Option<String>,
}

impl StatsRecord {
    pub fn best_score(&self, game: &str) -> Option<i64> {
        self.highest_scores.get(game).copied()
    }

    /// Counts one more completed game and keeps the best score for `game`.
    pub fn apply_result(&mut self, game: &str, score: i64) {
        self.games_played += 1;
        self.highest_scores
            .entry(game.to_owned())
            .and_modify(|best| *best = (*best).max(score))
            .or_insert(score);
    }
}

impl fmt::Display for StatsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Games Played: {}", self.games_played)?;
        writeln!(f, "Highest Scores:")?;
        for (game, score) in &self.highest_scores {
            writeln!(f, "  {game}: {score}")?;
        }
        write!(
            f,
            "Favorite Game: {}",
            self.favorite_game.as_deref().unwrap_or("None")
        )
    }
}

/// Sink for finished game sessions.
pub trait ResultRecorder {
    fn record_result(&self, game: GameKind, score: i64) -> Result<(), StatsError>;
}

impl<R: ResultRecorder + ?Sized> ResultRecorder for &R {
    fn record_result(&self, game: GameKind, score: i64) -> Result<(), StatsError> {
        (**self).record_result(game, score)
    }
}

/// File backed store for the single [`StatsRecord`].
///
/// Every update is a whole-record read-modify-write. Updates made through the same store are serialized by an
/// internal lock; separate processes writing the same file are not coordinated.
#[derive(Debug)]
pub struct StatsStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl StatsStore {
    pub const DEFAULT_FILE_NAME: &'static str = "career_stats.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the record, `None` when the file does not exist yet.
    pub fn load_existing(&self) -> Result<Option<StatsRecord>, StatsError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("No stats file at {:?}", self.path);
                return Ok(None);
            }
            Err(source) => return Err(self.io_error(source)),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StatsError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    /// Loads the record, falling back to an empty history when the file does not exist.
    pub fn load(&self) -> Result<StatsRecord, StatsError> {
        Ok(self.load_existing()?.unwrap_or_default())
    }

    pub fn record_result(&self, game: &str, score: i64) -> Result<StatsRecord, StatsError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut record = self.load()?;
        record.apply_result(game, score);
        self.save(&record)?;
        log::debug!(
            "Recorded {game} score {score}, games played: {}",
            record.games_played
        );
        Ok(record)
    }

    /// Human readable summary, or [`NO_STATS_MESSAGE`] when there is no history.
    pub fn summary(&self) -> Result<String, StatsError> {
        Ok(self
            .load_existing()?
            .map_or_else(|| NO_STATS_MESSAGE.to_owned(), |record| record.to_string()))
    }

    pub fn format(record: &StatsRecord) -> String {
        record.to_string()
    }

    fn save(&self, record: &StatsRecord) -> Result<(), StatsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let tmp_path = self.tmp_path();
        let write = || -> io::Result<()> {
            let mut file = fs::File::create(&tmp_path)?;
            serde_json::to_writer_pretty(&mut file, record)?;
            file.write_all(b"\n")?;
            file.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        };

        write().map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            self.io_error(source)
        })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn io_error(&self, source: io::Error) -> StatsError {
        StatsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ResultRecorder for StatsStore {
    fn record_result(&self, game: GameKind, score: i64) -> Result<(), StatsError> {
        StatsStore::record_result(self, game.name(), score).map(|_| ())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::*;

    /// Keeps reported results in memory.
    #[derive(Debug, Default)]
    pub(crate) struct MemoryRecorder {
        pub(crate) results: RefCell<Vec<(GameKind, i64)>>,
    }

    impl MemoryRecorder {
        pub(crate) fn results(&self) -> Vec<(GameKind, i64)> {
            self.results.borrow().clone()
        }
    }

    impl ResultRecorder for MemoryRecorder {
        fn record_result(&self, game: GameKind, score: i64) -> Result<(), StatsError> {
            self.results.borrow_mut().push((game, score));
            Ok(())
        }
    }
}
