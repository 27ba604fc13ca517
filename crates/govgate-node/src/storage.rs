//! RocksDB storage backend for governed resources.

use anyhow::Result;
use rocksdb::{ColumnFamilyDescriptor, Options, DB};
use std::path::Path;

const CF_RESOURCES: &str = "resources";

/// RocksDB-backed resource store, keyed by resource path.
pub struct Storage {
    db: DB,
}

impl Storage {
    /// Open or create a RocksDB database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors = vec![ColumnFamilyDescriptor::new(
            CF_RESOURCES,
            Options::default(),
        )];
        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;

        tracing::debug!(path = %path.display(), "resource store opened");
        Ok(Self { db })
    }

    pub fn put_resource(&self, path: &str, data: &[u8]) -> Result<()> {
        let cf = self
            .db
            .cf_handle(CF_RESOURCES)
            .ok_or_else(|| anyhow::anyhow!("column family '{}' not found", CF_RESOURCES))?;
        self.db.put_cf(&cf, path.as_bytes(), data)?;
        Ok(())
    }

    pub fn get_resource(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let cf = self
            .db
            .cf_handle(CF_RESOURCES)
            .ok_or_else(|| anyhow::anyhow!("column family '{}' not found", CF_RESOURCES))?;
        Ok(self.db.get_cf(&cf, path.as_bytes())?)
    }
}
