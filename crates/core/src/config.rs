//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! core services, so that no service reads process-wide environment
//! variables while handling an operation.

use crate::constants::{PATIENTS_DIR_NAME, STATION_FILE_NAME};
use crate::{DpsError, DpsResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    station_file: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `station_file` may be `None`, in which case the station config is
    /// expected at `<data_dir>/station.yaml`.
    pub fn new(data_dir: PathBuf, station_file: Option<PathBuf>) -> DpsResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(DpsError::InvalidInput("data_dir cannot be empty".into()));
        }

        let station_file = station_file.unwrap_or_else(|| data_dir.join(STATION_FILE_NAME));
        Ok(Self {
            data_dir,
            station_file,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn patients_dir(&self) -> PathBuf {
        self.data_dir.join(PATIENTS_DIR_NAME)
    }

    pub fn station_file(&self) -> &Path {
        &self.station_file
    }
}
