use std::sync::atomic::{AtomicU64, Ordering};

use containers::{BlockHeader, BlockNumber, Hash};
use tokio::sync::watch;
use tracing::info;

/// Holder of the active pivot during a world state download.
///
/// The pivot manager is the only writer. Readers get copies, never a live
/// reference.
pub trait DownloadStateStore: Send + Sync + 'static {
    /// Current pivot height, or `None` before sync has picked one.
    fn pivot_number(&self) -> Option<BlockNumber>;

    /// Atomically replaces the active pivot with `header`.
    fn set_current_header(&self, header: BlockHeader);
}

/// The block a snap/fast sync is currently downloading state for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotRecord {
    number: BlockNumber,
    header: Option<BlockHeader>,
}

impl PivotRecord {
    /// A pivot known only by height, e.g. the seed chosen at sync start.
    pub fn new(number: BlockNumber) -> Self {
        Self {
            number,
            header: None,
        }
    }

    pub fn from_header(header: BlockHeader) -> Self {
        Self {
            number: header.number,
            header: Some(header),
        }
    }

    pub fn number(&self) -> BlockNumber {
        self.number
    }

    pub fn header(&self) -> Option<&BlockHeader> {
        self.header.as_ref()
    }

    /// State root the download should target, once the header is known.
    pub fn state_root(&self) -> Option<Hash> {
        self.header.as_ref().map(|header| header.state_root)
    }
}

/// In-memory download state that publishes every pivot replacement.
///
/// Request schedulers subscribe to learn the new state root to retarget
/// their queues to.
#[derive(Debug)]
pub struct WorldDownloadState {
    pivot: watch::Sender<Option<PivotRecord>>,
    pivot_updates: AtomicU64,
}

impl WorldDownloadState {
    pub fn new() -> Self {
        Self::from_record(None)
    }

    pub fn with_pivot(record: PivotRecord) -> Self {
        Self::from_record(Some(record))
    }

    fn from_record(record: Option<PivotRecord>) -> Self {
        let (pivot, _) = watch::channel(record);
        Self {
            pivot,
            pivot_updates: AtomicU64::new(0),
        }
    }

    pub fn current_pivot(&self) -> Option<PivotRecord> {
        self.pivot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<PivotRecord>> {
        self.pivot.subscribe()
    }

    /// Number of times the pivot has been replaced.
    pub fn pivot_updates(&self) -> u64 {
        self.pivot_updates.load(Ordering::Acquire)
    }
}

impl Default for WorldDownloadState {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadStateStore for WorldDownloadState {
    fn pivot_number(&self) -> Option<BlockNumber> {
        self.pivot.borrow().as_ref().map(PivotRecord::number)
    }

    fn set_current_header(&self, header: BlockHeader) {
        let number = header.number;
        let state_root = header.state_root;
        let previous = self.pivot.send_replace(Some(PivotRecord::from_header(header)));
        self.pivot_updates.fetch_add(1, Ordering::AcqRel);

        info!(
            previous = ?previous.map(|record| record.number()),
            number,
            state_root = %state_root,
            "Pivot block replaced"
        );
    }
}
