use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::save::SaveFormatError;
use crate::snake::Snake;

const APP_DIR_NAME: &str = "grid-snake";
const SLOT_EXTENSION: &str = "snake";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("save file i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("save file is malformed: {0}")]
    Format(#[from] SaveFormatError),
}

/// Returns the platform-correct directory for save slots.
#[must_use]
pub fn save_dir() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base
}

/// Path of the save slot for one player, numbered from 1.
#[must_use]
pub fn slot_path(dir: &Path, player: usize) -> PathBuf {
    dir.join(format!("player{}.{SLOT_EXTENSION}", player + 1))
}

/// Writes `snake` to `path`, creating parent directories when needed.
pub fn save_snake(path: &Path, snake: &Snake) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, snake.serialize())?;
    info!(path = %path.display(), length = snake.len(), "snake saved");
    Ok(())
}

/// Restores `snake` from `path`.
///
/// Returns `Ok(false)` when the file does not exist yet, leaving the snake
/// untouched. Malformed data is reported as [`StorageError::Format`] and also
/// leaves the snake untouched.
pub fn load_snake(path: &Path, snake: &mut Snake) -> Result<bool, StorageError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };

    snake.deserialize(&raw)?;
    info!(path = %path.display(), length = snake.len(), "snake loaded");
    Ok(true)
}
