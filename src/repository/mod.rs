//! Repository layer over the flat-file stores

pub mod costumes;
pub mod members;
pub mod rentals;

use std::io::Write;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tempfile::NamedTempFile;

use crate::config::StoreConfig;
use crate::error::{AppError, AppResult};

/// Main repository struct holding one sub-repository per store file
#[derive(Clone)]
pub struct Repository {
    pub costumes: costumes::CostumesRepository,
    pub members: members::MembersRepository,
    pub rentals: rentals::RentalsRepository,
}

impl Repository {
    /// Load all stores from the configured data directory. Missing
    /// files are treated as empty stores.
    pub fn open(config: &StoreConfig) -> AppResult<Self> {
        Ok(Self {
            costumes: costumes::CostumesRepository::open(config.costumes_path())?,
            members: members::MembersRepository::open(config.members_path())?,
            rentals: rentals::RentalsRepository::open(config.rentals_path())?,
        })
    }
}

/// Read all data rows from a store file, skipping `#` comment lines and
/// blank lines. Rows the reader cannot decode at all are skipped with a
/// warning; per-field validation happens in the model codecs.
pub(crate) fn read_rows(path: &Path) -> AppResult<Vec<StringRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_path(path)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => {
                if record.iter().all(|f| f.trim().is_empty()) {
                    continue;
                }
                rows.push(record);
            }
            Err(e) => {
                tracing::warn!("{}: skipping unreadable row: {}", path.display(), e);
            }
        }
    }
    Ok(rows)
}

/// Replace a store file in one step: the full contents go to a
/// temporary file in the same directory, which is then renamed over the
/// target, so a crash mid-write never leaves a truncated store.
pub(crate) fn write_rows(path: &Path, header: &str, rows: &[Vec<String>]) -> AppResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    writeln!(tmp, "# {}", header)?;
    {
        let mut writer = WriterBuilder::new().flexible(true).from_writer(tmp.as_file_mut());
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .map_err(|e| AppError::Persistence(e.error))?;

    tracing::debug!("{}: wrote {} rows", path.display(), rows.len());
    Ok(())
}

// Lock helpers: the stores have a single cooperative writer, so a
// poisoned lock is recovered rather than propagated.
pub(crate) fn read_guard<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_guard<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
