// Tag manager: read-modify-write tag operations over a `FileStore`,
// scoped to one configured folder.

use crate::api::{FileRecord, FileStore, StoreResult};
use crate::tags::{TagSet, TAGS_PROPERTY};
use tracing::{debug, info};

/// High-level tag operations composed from the store calls and the codec.
///
/// Add/remove are plain read-modify-write sequences; the store has no
/// conditional update for the property bag, so a concurrent writer between
/// the read and the write is not detected and its change can be lost.
pub struct TagManager<S: FileStore> {
    store: S,
    folder_id: String,
}

impl<S: FileStore> TagManager<S> {
    pub fn new(store: S, folder_id: impl Into<String>) -> Self {
        TagManager {
            store,
            folder_id: folder_id.into(),
        }
    }

    pub fn folder_id(&self) -> &str {
        &self.folder_id
    }

    /// All files directly under the configured folder, read fresh from the
    /// remote store.
    pub fn list_files(&self) -> StoreResult<Vec<FileRecord>> {
        let files = self.store.list_files(&self.folder_id)?;
        debug!(count = files.len(), "listed folder");
        Ok(files)
    }

    /// Attach `tag` to the file. `Ok(false)` means the file already carried
    /// the tag and no write was performed.
    pub fn add_tag(&self, file_id: &str, tag: &str) -> StoreResult<bool> {
        let mut properties = self.store.get_properties(file_id)?;
        let mut tags = TagSet::from_properties(&properties);
        if !tags.insert(tag) {
            debug!(file_id, tag, "tag already present, skipping write");
            return Ok(false);
        }
        properties.insert(TAGS_PROPERTY.to_string(), tags.encode());
        self.store.update_properties(file_id, &properties)?;
        info!(file_id, tag, "tag added");
        Ok(true)
    }

    /// Detach `tag` from the file. `Ok(false)` means the tag was not there
    /// and no write was performed. Removing the last tag stores the empty
    /// string rather than dropping the property.
    pub fn remove_tag(&self, file_id: &str, tag: &str) -> StoreResult<bool> {
        let mut properties = self.store.get_properties(file_id)?;
        let mut tags = TagSet::from_properties(&properties);
        if !tags.remove(tag) {
            debug!(file_id, tag, "tag not present, skipping write");
            return Ok(false);
        }
        properties.insert(TAGS_PROPERTY.to_string(), tags.encode());
        self.store.update_properties(file_id, &properties)?;
        info!(file_id, tag, "tag removed");
        Ok(true)
    }

    /// Files in the folder whose decoded tag set contains `tag` exactly
    /// (case-sensitive, compared after trimming).
    pub fn search_by_tag(&self, tag: &str) -> StoreResult<Vec<FileRecord>> {
        let files = self.store.list_files(&self.folder_id)?;
        let tag = tag.trim();
        let matched: Vec<FileRecord> = files
            .into_iter()
            .filter(|f| TagSet::from_properties(&f.properties).contains(tag))
            .collect();
        debug!(tag, count = matched.len(), "tag search finished");
        Ok(matched)
    }
}
