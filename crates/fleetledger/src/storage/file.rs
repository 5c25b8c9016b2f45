//! Flat-file store.
//!
//! Each entity kind lives in its own text file inside a data directory. Files
//! are only ever opened for append; nothing is rewritten in place.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{Config, StorageConfig};
use crate::customer::Customer;
use crate::entry::LedgerEntry;
use crate::error::{Error, Result};
use crate::vehicle::Vehicle;

use super::records;
use super::{Snapshot, StatusChange, Store};

/// Seats given to vehicles read from lines that predate vehicle kinds.
pub const LEGACY_DEFAULT_SEATS: u32 = 5;

/// Append-only store backed by four text files.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    vehicles: PathBuf,
    customers: PathBuf,
    entries: PathBuf,
    status_changes: PathBuf,
    default_seats: u32,
}

impl FileStore {
    /// Open a store in `dir` using the default file names.
    ///
    /// Creates the directory if it doesn't exist. The files themselves are
    /// created on first append.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(dir, &StorageConfig::default(), LEGACY_DEFAULT_SEATS)
    }

    /// Open the store described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::open_with(
            config.data_dir(),
            &config.storage,
            config.rental.default_seats,
        )
    }

    fn open_with(dir: impl AsRef<Path>, storage: &StorageConfig, default_seats: u32) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|source| Error::DirectoryCreate {
                path: dir.clone(),
                source,
            })?;
        }

        info!("Using data directory {}", dir.display());
        Ok(Self {
            vehicles: dir.join(&storage.vehicles_file),
            customers: dir.join(&storage.customers_file),
            entries: dir.join(&storage.entries_file),
            status_changes: dir.join(&storage.status_file),
            dir,
            default_seats,
        })
    }

    /// The data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the vehicle store.
    #[must_use]
    pub fn vehicles_path(&self) -> &Path {
        &self.vehicles
    }

    /// Path of the customer store.
    #[must_use]
    pub fn customers_path(&self) -> &Path {
        &self.customers
    }

    /// Path of the entry store.
    #[must_use]
    pub fn entries_path(&self) -> &Path {
        &self.entries
    }

    /// Path of the status change store.
    #[must_use]
    pub fn status_changes_path(&self) -> &Path {
        &self.status_changes
    }

    /// Append one line and flush it to disk before returning.
    ///
    /// A previous append torn before its newline is terminated first, so it
    /// cannot swallow this record.
    fn append_line(path: &Path, line: &str) -> Result<()> {
        let write = || -> io::Result<()> {
            let mut file = OpenOptions::new()
                .read(true)
                .create(true)
                .append(true)
                .open(path)?;

            let mut record = String::with_capacity(line.len() + 2);
            if !Self::ends_with_newline(&mut file)? {
                record.push('\n');
            }
            record.push_str(line);
            record.push('\n');

            file.write_all(record.as_bytes())?;
            file.sync_data()
        };

        write().map_err(|source| Error::StoreWrite {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Appended to {}: {}", path.display(), line);
        Ok(())
    }

    /// Whether the file is empty or its last byte is a newline.
    fn ends_with_newline(file: &mut File) -> io::Result<bool> {
        if file.metadata()?.len() == 0 {
            return Ok(true);
        }
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))?;
        file.read_exact(&mut last)?;
        Ok(last[0] == b'\n')
    }

    /// Read a store's raw lines. A missing file is an empty store.
    ///
    /// Lines are split on bytes so one undecodable line cannot hide the rest.
    fn read_lines(path: &Path) -> Result<Vec<Vec<u8>>> {
        match fs::read(path) {
            Ok(contents) => Ok(contents
                .split(|&byte| byte == b'\n')
                .map(<[u8]>::to_vec)
                .collect()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(Error::StoreRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Decode every well-formed line of a store, skipping the rest.
    fn load_records<T>(path: &Path, decode: impl Fn(&str) -> Result<T>) -> Vec<T> {
        let lines = match Self::read_lines(path) {
            Ok(lines) => lines,
            Err(e) => {
                warn!("{}; starting with an empty collection", e);
                return Vec::new();
            }
        };

        let mut records = Vec::with_capacity(lines.len());
        for (index, raw) in lines.iter().enumerate() {
            let line = match std::str::from_utf8(raw) {
                Ok(line) => line,
                Err(e) => {
                    warn!("Skipping {}:{}: {}", path.display(), index + 1, e);
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match decode(line) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping {}:{}: {}", path.display(), index + 1, e),
            }
        }
        debug!("Loaded {} records from {}", records.len(), path.display());
        records
    }
}

impl Store for FileStore {
    fn load(&self) -> Snapshot {
        let default_seats = self.default_seats;
        Snapshot {
            vehicles: Self::load_records(&self.vehicles, |line| {
                records::decode_vehicle(line, default_seats)
            }),
            customers: Self::load_records(&self.customers, records::decode_customer),
            entries: Self::load_records(&self.entries, records::decode_entry),
            status_changes: Self::load_records(&self.status_changes, records::decode_status_change),
        }
    }

    fn append_vehicle(&mut self, vehicle: &Vehicle) -> Result<()> {
        Self::append_line(&self.vehicles, &records::encode_vehicle(vehicle)?)
    }

    fn append_customer(&mut self, customer: &Customer) -> Result<()> {
        Self::append_line(&self.customers, &records::encode_customer(customer))
    }

    fn append_entry(&mut self, entry: &LedgerEntry) -> Result<()> {
        Self::append_line(&self.entries, &records::encode_entry(entry))
    }

    fn append_status_change(&mut self, change: &StatusChange) -> Result<()> {
        Self::append_line(&self.status_changes, &records::encode_status_change(change))
    }
}
