//! Files written by a training run: the plain-text log, the per-iteration
//! scores and the final network weights.

use crate::error::TrainError;
use crate::policy::Weights;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only training log mirroring the summary lines sent to `tracing`.
pub struct RunLog {
    path: PathBuf,
    file: File,
}

impl RunLog {
    /// # Errors
    ///
    /// Fails if the log file cannot be opened for appending.
    pub fn open(path: &Path) -> Result<Self, TrainError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| TrainError::io(path, e))?;
        Ok(Self { path: path.to_path_buf(), file })
    }

    /// # Errors
    ///
    /// Fails if the line cannot be written.
    pub fn line(&mut self, msg: &str) -> Result<(), TrainError> {
        writeln!(self.file, "{msg}").map_err(|e| TrainError::io(&self.path, e))
    }
}

/// Overwrites `path` with the scores so far as a JSON array.
///
/// # Errors
///
/// Fails on serialization or write errors.
pub fn save_scores(path: &Path, scores: &[f32]) -> Result<(), TrainError> {
    let json = serde_json::to_string(scores)?;
    fs::write(path, json).map_err(|e| TrainError::io(path, e))
}

/// Reads scores written by [`save_scores`].
///
/// # Errors
///
/// Fails on read or parse errors.
pub fn load_scores(path: &Path) -> Result<Vec<f32>, TrainError> {
    let json = fs::read_to_string(path).map_err(|e| TrainError::io(path, e))?;
    Ok(serde_json::from_str(&json)?)
}

/// Writes `weights` as `<dir>/<name>.json`, creating `dir` if needed.
///
/// # Errors
///
/// Fails on directory creation, serialization or write errors.
pub fn save_weights(dir: &Path, name: &str, weights: &Weights) -> Result<PathBuf, TrainError> {
    fs::create_dir_all(dir).map_err(|e| TrainError::io(dir, e))?;
    let path = dir.join(format!("{name}.json"));
    let json = serde_json::to_string_pretty(weights)?;
    fs::write(&path, json).map_err(|e| TrainError::io(&path, e))?;
    Ok(path)
}
