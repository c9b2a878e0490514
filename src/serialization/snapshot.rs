use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::{Grid, GridValues};
use crate::error::EngineError;

/// Persistable state of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub score: u64,
    /// Changed moves played so far.
    #[serde(default)]
    pub moves: u64,
    /// Row-major tiles, `null` for empty cells.
    pub grid: GridValues,
}

impl Snapshot {
    /// Validate the stored tiles and rebuild the grid.
    pub fn grid(&self) -> Result<Grid, EngineError> {
        Grid::from_values(&self.grid)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("postcard error: {0}")]
    Postcard(#[from] postcard::Error),
    #[error("invalid snapshot: {0}")]
    Engine(#[from] EngineError),
}

/// Encode a snapshot to postcard bytes.
pub fn to_postcard_bytes(snapshot: &Snapshot) -> Result<Vec<u8>, SnapshotError> {
    Ok(postcard::to_allocvec(snapshot)?)
}

/// Decode a snapshot from postcard bytes and validate its grid.
pub fn from_postcard_bytes(bytes: &[u8]) -> Result<Snapshot, SnapshotError> {
    let snapshot: Snapshot = postcard::from_bytes(bytes)?;
    snapshot.grid()?;
    Ok(snapshot)
}

/// Write a snapshot as pretty JSON.
pub fn write_json_to_path<P: AsRef<Path>>(path: P, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    let text = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, text)?;
    Ok(())
}

/// Read a JSON snapshot and validate its grid.
pub fn read_json_from_path<P: AsRef<Path>>(path: P) -> Result<Snapshot, SnapshotError> {
    let text = fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&text)?;
    snapshot.grid()?;
    Ok(snapshot)
}

/// Write JSON for `.json` paths and postcard for anything else.
pub fn write_to_path<P: AsRef<Path>>(path: P, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    if is_json(path.as_ref()) {
        write_json_to_path(path, snapshot)
    } else {
        fs::write(path, to_postcard_bytes(snapshot)?)?;
        Ok(())
    }
}

/// Counterpart of [`write_to_path`].
pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Snapshot, SnapshotError> {
    if is_json(path.as_ref()) {
        read_json_from_path(path)
    } else {
        from_postcard_bytes(&fs::read(path)?)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
