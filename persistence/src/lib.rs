#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Versioned save-file store for Icebound matches.
//!
//! One file per identifier under a root directory. Every file opens with a
//! schema header line so a loader can refuse incompatible saves outright
//! instead of corrupting the live match; the body is a serde_json document
//! of the match snapshot. Writes go to a temp file first and are renamed
//! into place, so a failed save never leaves a truncated file behind.

use std::fs;
use std::io;
use std::path::PathBuf;

use icebound_session::{Match, MatchSnapshot};
use icebound_strategy::StrategyCatalog;
use thiserror::Error;

/// Schema marker written as the first line of every save file.
const HEADER: &str = "icebound:v1";

const EXTENSION: &str = "save";

/// File-per-identifier store rooted at one directory.
#[derive(Clone, Debug)]
pub struct SaveStore {
    root: PathBuf,
}

impl SaveStore {
    /// Creates a store rooted at the given directory. The directory is
    /// created lazily on the first save.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Persists the match under the identifier, replacing any previous
    /// save. All-or-nothing: the match itself is never touched, and a
    /// failure leaves any existing file intact.
    pub fn save(&self, id: &str, game: &Match) -> Result<(), SaveError> {
        let path = self.path_for(id)?;
        fs::create_dir_all(&self.root)?;
        let body = serde_json::to_string_pretty(&game.snapshot()).map_err(SaveError::Corrupt)?;
        let staging = path.with_extension("save.partial");
        fs::write(&staging, format!("{HEADER}\n{body}\n"))?;
        fs::rename(&staging, &path)?;
        log::info!("saved match {id:?} to {}", path.display());
        Ok(())
    }

    /// Loads the identified save, rebinding persisted strategy kind tags
    /// through the catalog. Missing, version-mismatched and corrupt saves
    /// each fail with their own variant.
    pub fn load(&self, id: &str, catalog: &StrategyCatalog) -> Result<Match, SaveError> {
        let path = self.path_for(id)?;
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(SaveError::MissingSave(id.to_owned()));
            }
            Err(err) => return Err(SaveError::Io(err)),
        };
        let (header, body) = raw.split_once('\n').unwrap_or((raw.as_str(), ""));
        if header.trim_end() != HEADER {
            return Err(SaveError::UnsupportedVersion(header.trim_end().to_owned()));
        }
        let snapshot: MatchSnapshot = serde_json::from_str(body).map_err(SaveError::Corrupt)?;
        log::info!("loaded match {id:?} from {}", path.display());
        Ok(Match::restore(snapshot, catalog))
    }

    /// Whether a save exists under the identifier. False for identifiers
    /// that would be rejected anyway.
    #[must_use]
    pub fn exists(&self, id: &str) -> bool {
        self.path_for(id).map(|path| path.is_file()).unwrap_or(false)
    }

    /// Removes the identified save. Fails when none exists.
    pub fn delete(&self, id: &str) -> Result<(), SaveError> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(SaveError::MissingSave(id.to_owned()))
            }
            Err(err) => Err(SaveError::Io(err)),
        }
    }

    /// Maps an identifier to its file path. Identifiers are restricted to
    /// alphanumerics, `-` and `_`, which rules out path traversal.
    fn path_for(&self, id: &str) -> Result<PathBuf, SaveError> {
        let well_formed = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !well_formed {
            return Err(SaveError::InvalidIdentifier(id.to_owned()));
        }
        Ok(self.root.join(format!("{id}.{EXTENSION}")))
    }
}

/// Why a persistence operation failed.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The identifier contains characters outside the allowed set.
    #[error("identifier {0:?} contains characters outside [A-Za-z0-9_-]")]
    InvalidIdentifier(String),
    /// No save file exists under the identifier.
    #[error("no save named {0:?}")]
    MissingSave(String),
    /// The save file opens with a header this build does not understand.
    #[error("save carries unsupported header {0:?}")]
    UnsupportedVersion(String),
    /// The save body is not a valid match snapshot.
    #[error("save payload is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
    /// The underlying filesystem operation failed.
    #[error("save i/o failed: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::{SaveError, SaveStore};

    #[test]
    fn identifiers_are_restricted_to_safe_characters() {
        let store = SaveStore::new("/tmp/unused");
        for id in ["save1", "a-b_c", "X9"] {
            assert!(store.path_for(id).is_ok(), "{id} should be accepted");
        }
        for id in ["", "../evil", "a b", "saves/1", "dot."] {
            assert!(
                matches!(store.path_for(id), Err(SaveError::InvalidIdentifier(_))),
                "{id:?} should be rejected"
            );
        }
    }

    #[test]
    fn exists_is_false_for_rejected_identifiers() {
        let store = SaveStore::new("/tmp/unused");
        assert!(!store.exists("../evil"));
    }
}
