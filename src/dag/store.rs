//! Label Store
//!
//! Flat file of fixed-size label records addressed by the level-order
//! index scheme. Reads are direct offset lookups (`offset = index * 32`);
//! the store is expected to hold up to `2^(m+1)` records, so anything
//! short of O(1) addressing is a correctness bug, not a slow path.
//!
//! One store belongs to exactly one proving session for one commitment.
//! It is not a database: no format compatibility across sessions, and the
//! backing file is removed when the store is dropped.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::core::hash::{Label, LABEL_SIZE};

/// Errors from label persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying file I/O failed. Session-fatal; a partial DAG cannot be
    /// trusted.
    #[error("label store I/O failure: {0}")]
    Io(#[from] io::Error),

    /// The index was never written in this session.
    #[error("no label written at index {index}")]
    NotFound {
        /// Requested record index.
        index: u64,
    },

    /// Write past the configured index space.
    #[error("index {index} is outside the store layout of {capacity} slots")]
    Capacity {
        /// Requested record index.
        index: u64,
        /// Configured slot count.
        capacity: u64,
    },
}

/// Session-scoped, randomly addressable label file.
pub struct LabelStore {
    file: File,
    path: PathBuf,
    capacity: u64,
    /// One bit per slot; distinguishes "written" from bytes a sparse file
    /// would report as zeros.
    written: Vec<u64>,
}

impl LabelStore {
    /// Create a fresh store under `dir` with room for `capacity` records.
    ///
    /// The backing file gets a unique name, so concurrent sessions in the
    /// same directory never share an index namespace.
    pub fn create(dir: &Path, capacity: u64) -> Result<Self, StoreError> {
        let path = dir.join(format!("labels-{}.bin", Uuid::new_v4()));
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)?;
        let words = capacity as usize / 64 + 1;
        Ok(Self {
            file,
            path,
            capacity,
            written: vec![0; words],
        })
    }

    /// Configured slot count.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if `index` holds a record from this session.
    pub fn contains(&self, index: u64) -> bool {
        index < self.capacity
            && self.written[index as usize / 64] & (1u64 << (index % 64)) != 0
    }

    /// Persist the record at `index`, overwriting any previous record.
    pub fn write(&mut self, index: u64, label: &Label) -> Result<(), StoreError> {
        if index >= self.capacity {
            return Err(StoreError::Capacity {
                index,
                capacity: self.capacity,
            });
        }
        self.file.write_all_at(label, index * LABEL_SIZE as u64)?;
        self.written[index as usize / 64] |= 1u64 << (index % 64);
        Ok(())
    }

    /// Read the record at `index` by direct offset addressing.
    pub fn read(&self, index: u64) -> Result<Label, StoreError> {
        if !self.contains(index) {
            return Err(StoreError::NotFound { index });
        }
        let mut label = [0u8; LABEL_SIZE];
        self.file.read_exact_at(&mut label, index * LABEL_SIZE as u64)?;
        Ok(label)
    }
}

impl Drop for LabelStore {
    fn drop(&mut self) {
        // Session-scoped storage; stale label files must not outlive the
        // session that wrote them.
        let _ = std::fs::remove_file(&self.path);
    }
}
