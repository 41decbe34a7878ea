use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use domain::Discount;

use super::{DiscountPersistence, decode, encode};
use crate::error::PersistenceError;

/// Persistence backed by a single JSON file.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so a crash never leaves a half-written payload behind. All I/O
/// uses blocking `std::fs` calls.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DiscountPersistence for FilePersistence {
    fn load(&self) -> Option<Discount> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => decode(&raw),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "could not read stored discount");
                None
            }
        }
    }

    fn save(&self, discount: Option<&Discount>) -> Result<(), PersistenceError> {
        let Some(discount) = discount else {
            return match std::fs::remove_file(&self.path) {
                Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
                _ => Ok(()),
            };
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        std::fs::write(&temp, encode(discount)?)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }
}
