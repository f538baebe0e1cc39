use crate::models::MrfFile;
use crate::storage::MrfStorage;
use crate::types::MrfFileId;
use dashmap::DashMap;
use std::sync::Arc;

pub struct MrfFileStorage {
    files: Arc<DashMap<MrfFileId, MrfFile>>
}

impl MrfFileStorage {
    pub fn new() -> Self {
        Self {
            files: Arc::new(DashMap::new())
        }
    }
}

impl MrfStorage for MrfFileStorage {
    fn load(&self, id: MrfFileId) -> Option<MrfFile> {
        self.files.get(&id).map(|entry| entry.value().clone())
    }

    fn save(&self, file: MrfFile) {
        self.files.insert(file.id, file);
    }

    fn list(&self) -> Vec<MrfFile> {
        let mut files: Vec<MrfFile> = self.files.iter().map(|entry| entry.value().clone()).collect();
        files.sort_by_key(|file| file.id);
        files
    }
}
