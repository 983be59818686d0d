//! In-memory `ObjectStore` for pipeline tests.

use packzip_core::store::{Blob, ObjectStore, StoreError};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Default)]
pub struct MemoryStore {
    objects: BTreeMap<String, Vec<u8>>,
    /// Prefixes listed, in call order.
    pub listed: Vec<String>,
    /// Object names downloaded, in call order.
    pub downloaded: Vec<String>,
    /// Downloads of this object fail with HTTP 403.
    pub deny: Option<String>,
}

impl MemoryStore {
    pub fn with_objects(objects: &[(&str, &str)]) -> Self {
        Self {
            objects: objects
                .iter()
                .map(|(name, body)| (name.to_string(), body.as_bytes().to_vec()))
                .collect(),
            ..Self::default()
        }
    }
}

impl ObjectStore for MemoryStore {
    fn list_blobs(&mut self, prefix: &str) -> Result<Vec<Blob>, StoreError> {
        self.listed.push(prefix.to_string());
        Ok(self
            .objects
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, body)| {
                let mut blob = Blob::new(name.clone());
                blob.size = Some(body.len() as u64);
                blob
            })
            .collect())
    }

    fn download_to_path(&mut self, blob: &Blob, dest: &Path) -> Result<u64, StoreError> {
        if self.deny.as_deref() == Some(blob.name.as_str()) {
            return Err(StoreError::Http {
                status: 403,
                url: blob.name.clone(),
            });
        }
        let body = self.objects.get(&blob.name).ok_or(StoreError::Http {
            status: 404,
            url: blob.name.clone(),
        })?;
        std::fs::write(dest, body)?;
        self.downloaded.push(blob.name.clone());
        Ok(body.len() as u64)
    }
}
