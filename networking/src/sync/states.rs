use containers::{BlockHeader, BlockNumber};

/// Progress of the search for a replacement pivot block.
///
/// Each completed step of an episode moves the search forward and carries
/// forward what that step produced, so a half-finished search can never be
/// mistaken for a usable candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CandidateSearch {
    /// No search running. The next stale check starts one.
    #[default]
    Idle,

    /// Waiting for enough peers to negotiate a pivot with.
    AwaitingPeers,

    /// Peers are available; choosing a height far enough behind their tips.
    SelectingHeight,

    /// Height chosen; fetching and validating its header.
    DownloadingHeader { number: BlockNumber },

    /// Candidate header downloaded. Kept across checks until the chain head
    /// reaches it, then adopted as the new pivot.
    Ready {
        number: BlockNumber,
        header: BlockHeader,
    },
}

impl CandidateSearch {
    /// Check if a transition to the target state is valid.
    ///
    /// Steps only move forward; any in-flight state may fall back to `Idle`
    /// when its episode fails.
    pub fn can_transition_to(&self, target: &CandidateSearch) -> bool {
        use CandidateSearch::*;

        match (self, target) {
            (Idle, AwaitingPeers) => true,
            (AwaitingPeers, SelectingHeight) => true,
            (SelectingHeight, DownloadingHeader { .. }) => true,
            (DownloadingHeader { number }, Ready { number: ready, header }) => {
                ready == number && header.number == *number
            }
            (Ready { .. }, Idle) => true,
            (AwaitingPeers | SelectingHeight | DownloadingHeader { .. }, Idle) => true,
            _ => false,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, CandidateSearch::Idle)
    }

    /// An episode is running and has not produced a candidate yet.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            CandidateSearch::AwaitingPeers
                | CandidateSearch::SelectingHeight
                | CandidateSearch::DownloadingHeader { .. }
        )
    }

    pub fn ready_candidate(&self) -> Option<&BlockHeader> {
        match self {
            CandidateSearch::Ready { header, .. } => Some(header),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CandidateSearch::Idle => "idle",
            CandidateSearch::AwaitingPeers => "awaiting_peers",
            CandidateSearch::SelectingHeight => "selecting_height",
            CandidateSearch::DownloadingHeader { .. } => "downloading_header",
            CandidateSearch::Ready { .. } => "ready",
        }
    }
}
