use anyhow::Result;
use containers::{BlockHeader, BlockNumber};

/// Parameters threaded through the steps of a pivot search.
///
/// Every search starts from [`NegotiationContext::empty`], never from the
/// active pivot, so nothing assumed about the pivot being replaced can bias
/// the choice of its successor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NegotiationContext {
    pivot_block_number: Option<BlockNumber>,
    pivot_block_header: Option<BlockHeader>,
}

impl NegotiationContext {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_pivot_block_number(number: BlockNumber) -> Self {
        Self {
            pivot_block_number: Some(number),
            pivot_block_header: None,
        }
    }

    pub fn with_pivot_block_header(header: BlockHeader) -> Self {
        Self {
            pivot_block_number: Some(header.number),
            pivot_block_header: Some(header),
        }
    }

    pub fn pivot_block_number(&self) -> Option<BlockNumber> {
        self.pivot_block_number
    }

    pub fn into_pivot_block_header(self) -> Option<BlockHeader> {
        self.pivot_block_header
    }
}

/// Peer-facing operations used to find and materialize a new pivot block.
///
/// Implemented by the peer-selection and header-download machinery. Each
/// step receives the context produced by the previous one. Steps are never
/// retried individually: an error ends the whole search.
#[async_trait::async_trait]
pub trait PivotCandidateResolver: Send + Sync + 'static {
    /// Resolves once enough suitable peers are connected.
    ///
    /// Fails if none show up within the implementation's own timeout.
    async fn wait_for_suitable_peers(
        &self,
        context: NegotiationContext,
    ) -> Result<NegotiationContext>;

    /// Chooses a height far enough behind the peers' tips to be stable.
    async fn select_pivot_block(&self, context: NegotiationContext) -> Result<NegotiationContext>;

    /// Fetches and validates the header at the selected height.
    async fn download_pivot_block_header(
        &self,
        context: NegotiationContext,
    ) -> Result<NegotiationContext>;
}
