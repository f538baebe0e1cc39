mod claim_store;
mod mrf_storage;

use crate::models::MrfFile;
use crate::types::MrfFileId;

pub use claim_store::{ApprovalOutcome, ClaimStore};
pub use mrf_storage::MrfFileStorage;

pub trait MrfStorage: Send + Sync + 'static {
    fn load(&self, id: MrfFileId) -> Option<MrfFile>;
    fn save(&self, file: MrfFile);
    /// All stored files, oldest first.
    fn list(&self) -> Vec<MrfFile>;
}
