use std::collections::HashSet;
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::engine::{AggregationError, MrfAggregator};
use crate::models::{ClaimRecord, MrfFile};
use crate::storage::MrfStorage;
use crate::types::{ClaimId, MrfFileId};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Result of an approval request.
#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalOutcome {
    /// The approved queue is still below the threshold.
    Pending {
        approved_count: usize,
        remaining_needed: usize
    },
    /// The approved queue reached the threshold and was published as one file.
    Published(MrfFile)
}

#[derive(Default)]
struct ClaimQueues {
    pending: Vec<ClaimRecord>,
    approved: Vec<ClaimRecord>,
    last_file_id: MrfFileId
}

impl ClaimQueues {
    /// Millisecond timestamp ids, bumped so they stay strictly increasing.
    fn next_file_id(&mut self, now: DateTime<Utc>) -> MrfFileId {
        let id = now.timestamp_millis().max(self.last_file_id + 1);
        self.last_file_id = id;
        id
    }
}

/// Owner of the pending and approved claim queues and the published files.
///
/// Every read-modify-write sequence runs under a single lock, so overlapping approve
/// and reject requests cannot lose updates.
pub struct ClaimStore<S: MrfStorage> {
    queues: Mutex<ClaimQueues>,
    storage: Arc<S>,
    aggregator: MrfAggregator,
    approval_threshold: usize,
    clock: Clock
}

impl<S: MrfStorage> ClaimStore<S> {
    pub fn new(storage: Arc<S>, config: &ServiceConfig) -> Self {
        Self {
            queues: Mutex::new(ClaimQueues::default()),
            storage,
            aggregator: MrfAggregator::new(config.reporting_entity.clone()),
            approval_threshold: config.approval_threshold.max(1),
            clock: Arc::new(Utc::now)
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Appends validated records to the pending queue.
    pub fn ingest(&self, records: Vec<ClaimRecord>) -> usize {
        let count = records.len();
        let mut queues = self.lock();
        queues.pending.extend(records);

        info!("Queued {count} claims for review ({} pending)", queues.pending.len());

        count
    }

    pub fn pending(&self) -> Vec<ClaimRecord> {
        self.lock().pending.clone()
    }

    pub fn approved(&self) -> Vec<ClaimRecord> {
        self.lock().approved.clone()
    }

    /// Moves the matching pending claims to the approved queue and publishes an MRF file
    /// once the approved queue reaches the threshold.
    ///
    /// # Errors
    /// Returns `AggregationError` if publication fails. The approval itself is kept and the
    /// approved claims stay queued for the next attempt.
    pub fn approve_by_ids(&self, claim_ids: &[ClaimId]) -> Result<ApprovalOutcome, AggregationError> {
        let ids: HashSet<&str> = claim_ids.iter().map(String::as_str).collect();
        let mut queues = self.lock();

        let (approved, pending): (Vec<ClaimRecord>, Vec<ClaimRecord>) = mem::take(&mut queues.pending)
            .into_iter()
            .partition(|claim| ids.contains(claim.claim_id.as_str()));

        queues.pending = pending;
        info!("Approved {} claims", approved.len());
        queues.approved.extend(approved);

        match self.publish_if_ready(&mut queues)? {
            Some(file) => Ok(ApprovalOutcome::Published(file)),
            None => Ok(self.pending_outcome(&queues))
        }
    }

    /// Progress of the approved queue towards the next publication.
    pub fn approval_status(&self) -> ApprovalOutcome {
        self.pending_outcome(&self.lock())
    }

    /// Drops the matching claims from the pending queue.
    pub fn reject_by_ids(&self, claim_ids: &[ClaimId]) -> usize {
        let ids: HashSet<&str> = claim_ids.iter().map(String::as_str).collect();
        let mut queues = self.lock();
        let before = queues.pending.len();

        queues.pending.retain(|claim| !ids.contains(claim.claim_id.as_str()));

        let rejected = before - queues.pending.len();
        info!("Rejected {rejected} claims");

        rejected
    }

    /// Publishes the approved queue if it has reached the threshold, e.g. to retry after a
    /// failed generation without approving more claims.
    pub fn try_aggregate(&self) -> Result<Option<MrfFile>, AggregationError> {
        let mut queues = self.lock();
        self.publish_if_ready(&mut queues)
    }

    pub fn mrf_files(&self) -> Vec<MrfFile> {
        self.storage.list()
    }

    pub fn mrf_file(&self, id: MrfFileId) -> Option<MrfFile> {
        self.storage.load(id)
    }

    fn publish_if_ready(&self, queues: &mut ClaimQueues) -> Result<Option<MrfFile>, AggregationError> {
        if queues.approved.len() < self.approval_threshold {
            return Ok(None);
        }

        let now = (self.clock)();
        let document = self.aggregator.aggregate(&queues.approved, now.date_naive())
            .inspect_err(|error| warn!("MRF generation failed, {} approved claims remain queued: {error}", queues.approved.len()))?;

        let file = MrfFile::new(queues.next_file_id(now), now, document)?;
        self.storage.save(file.clone());

        info!("Published MRF file [{}] {} from {} claims ({})", file.id, file.name, queues.approved.len(), file.size);
        queues.approved.clear();

        Ok(Some(file))
    }

    fn pending_outcome(&self, queues: &ClaimQueues) -> ApprovalOutcome {
        ApprovalOutcome::Pending {
            approved_count: queues.approved.len(),
            remaining_needed: self.approval_threshold.saturating_sub(queues.approved.len())
        }
    }

    fn lock(&self) -> MutexGuard<'_, ClaimQueues> {
        // Queue updates are plain moves between vectors, so a poisoned lock still guards usable state.
        self.queues.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
