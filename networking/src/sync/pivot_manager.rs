//! Dynamic pivot block management for snap/fast sync.
//!
//! A world state download can run for hours while the chain keeps growing.
//! Peers stop serving state for blocks that fall too far behind their head,
//! so the pivot has to move forward without throwing away what was already
//! downloaded.
//!
//! ## How It Works
//!
//! The sync loop calls [`DynamicPivotBlockManager::check`] on its polling
//! cadence. Each call:
//!
//! 1. Compares the active pivot with the best known chain height
//! 2. Returns if the pivot is still close to the head
//! 3. Otherwise starts a single background search for a replacement
//!    (wait for peers -> select height -> download header)
//! 4. Once a candidate is ready and the head has reached it, replaces the
//!    pivot and notifies the caller
//!
//! `check` never waits on the network. While a search is running, further
//! checks are no-ops, so peers are never asked twice for the same episode.
use std::sync::Arc;

use anyhow::{Context, Result, ensure};
use containers::{BlockHeader, BlockNumber};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use super::{
    chain_head::ChainHeightOracle,
    config::PivotBlockConfig,
    download_state::DownloadStateStore,
    resolver::{NegotiationContext, PivotCandidateResolver},
    states::CandidateSearch,
};

/// What a single [`DynamicPivotBlockManager::check`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotCheck {
    /// The pivot is still close enough to the chain head.
    CloseToHead,
    /// The pivot is stale and a new search was started.
    SearchStarted,
    /// A search is already running.
    SearchInFlight,
    /// A candidate is ready but the chain head has not reached it yet.
    WaitingForHead { candidate: BlockNumber },
    /// The pivot was replaced by the candidate.
    Switched { number: BlockNumber },
    /// The pivot is stale but no async runtime is available to search on.
    RuntimeUnavailable,
}

/// Keeps the pivot block within one search of the chain head.
///
/// ## Concurrency
///
/// `check` must not be called concurrently; the sync loop serializes it. The
/// search runs as a tokio task and shares only the [`CandidateSearch`] state
/// with `check`. The lock on it is never held across an await.
pub struct DynamicPivotBlockManager<O, R, S> {
    config: PivotBlockConfig,
    oracle: Arc<O>,
    resolver: Arc<R>,
    store: Arc<S>,
    search: Arc<Mutex<CandidateSearch>>,
}

impl<O, R, S> DynamicPivotBlockManager<O, R, S>
where
    O: ChainHeightOracle,
    R: PivotCandidateResolver,
    S: DownloadStateStore,
{
    pub fn new(config: PivotBlockConfig, oracle: Arc<O>, resolver: Arc<R>, store: Arc<S>) -> Self {
        Self {
            config,
            oracle,
            resolver,
            store,
            search: Arc::new(Mutex::new(CandidateSearch::default())),
        }
    }

    /// Snapshot of the current search state.
    pub fn search_state(&self) -> CandidateSearch {
        self.search.lock().clone()
    }

    /// Checks the pivot against the chain head and moves it forward if needed.
    ///
    /// `on_switch` is called with the new pivot header, after the store has
    /// been updated, if and only if this call replaced the pivot.
    pub fn check<F>(&self, on_switch: F) -> PivotCheck
    where
        F: FnOnce(&BlockHeader),
    {
        let head = self.oracle.best_chain_height();
        let pivot = self.store.pivot_number();

        // No pivot at all counts as maximally stale.
        if let Some(pivot) = pivot {
            if self.config.is_close_to_head(pivot, head) {
                return PivotCheck::CloseToHead;
            }
        }

        let mut search = self.search.lock();
        // Taken out under the lock; every arm leaves the right state behind.
        match std::mem::take(&mut *search) {
            CandidateSearch::Idle => {
                let Ok(runtime) = Handle::try_current() else {
                    warn!(head, pivot, "Pivot block is stale but no runtime is available to search");
                    return PivotCheck::RuntimeUnavailable;
                };

                *search = CandidateSearch::AwaitingPeers;
                drop(search);
                let episode = SearchEpisode::new(self.search.clone());

                info!(
                    head,
                    pivot,
                    threshold = self.config.close_to_head_threshold,
                    "Pivot block is stale, searching for a new one"
                );

                runtime.spawn(run_search(
                    self.resolver.clone(),
                    episode,
                    self.config.clone(),
                ));
                PivotCheck::SearchStarted
            }
            CandidateSearch::Ready { number, header } if !self.config.can_switch_to(number, head) => {
                *search = CandidateSearch::Ready { number, header };
                debug!(head, candidate = number, "Waiting for chain head to reach pivot candidate");
                PivotCheck::WaitingForHead { candidate: number }
            }
            CandidateSearch::Ready { number, header } => {
                drop(search);
                self.switch_to(header, pivot, on_switch);
                PivotCheck::Switched { number }
            }
            in_flight => {
                debug!(state = in_flight.name(), "Pivot block search in flight");
                *search = in_flight;
                PivotCheck::SearchInFlight
            }
        }
    }

    fn switch_to<F>(&self, header: BlockHeader, previous: Option<BlockNumber>, on_switch: F)
    where
        F: FnOnce(&BlockHeader),
    {
        info!(
            previous,
            number = header.number,
            hash = %header.hash(),
            "Switching to new pivot block"
        );

        self.store.set_current_header(header.clone());
        on_switch(&header);
    }
}

/// Ownership of the in-flight search by one episode.
///
/// Created before the episode is spawned and moved into it. If the episode
/// never reports an outcome (panic in a resolver step, task dropped with its
/// runtime) the search falls back to `Idle` when this is dropped.
struct SearchEpisode {
    search: Arc<Mutex<CandidateSearch>>,
    finished: bool,
}

impl SearchEpisode {
    fn new(search: Arc<Mutex<CandidateSearch>>) -> Self {
        Self {
            search,
            finished: false,
        }
    }

    fn advance(&self, next: CandidateSearch) {
        let mut state = self.search.lock();
        if !state.can_transition_to(&next) {
            warn!(
                from = state.name(),
                to = next.name(),
                "Invalid candidate search transition attempted"
            );
            return;
        }
        debug!(state = next.name(), "Candidate search advanced");
        *state = next;
    }

    /// Publishes the outcome of the episode. An invalid outcome resets to `Idle`.
    fn finish(mut self, outcome: CandidateSearch) {
        self.finished = true;
        let mut state = self.search.lock();
        if state.can_transition_to(&outcome) {
            *state = outcome;
        } else {
            warn!(
                from = state.name(),
                to = outcome.name(),
                "Invalid candidate search outcome, resetting"
            );
            *state = CandidateSearch::Idle;
        }
    }
}

impl Drop for SearchEpisode {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut state = self.search.lock();
        if state.is_in_flight() {
            warn!(state = state.name(), "Pivot block search ended without an outcome");
            *state = CandidateSearch::Idle;
        }
    }
}

/// Runs one search episode to completion and publishes its outcome.
async fn run_search<R: PivotCandidateResolver>(
    resolver: Arc<R>,
    episode: SearchEpisode,
    config: PivotBlockConfig,
) {
    let outcome = tokio::time::timeout(
        config.search_timeout(),
        resolve_candidate(resolver.as_ref(), &episode),
    )
    .await;

    match outcome {
        Ok(Ok(header)) => {
            info!(
                number = header.number,
                hash = %header.hash(),
                "New pivot block candidate ready"
            );
            episode.finish(CandidateSearch::Ready {
                number: header.number,
                header,
            });
        }
        Ok(Err(err)) => {
            warn!("Pivot block search failed: {err:#}");
            episode.finish(CandidateSearch::Idle);
        }
        Err(_) => {
            warn!(
                timeout_secs = config.search_timeout_secs,
                "Pivot block search timed out"
            );
            episode.finish(CandidateSearch::Idle);
        }
    }
}

/// Walks the resolver through its three steps, strictly in order.
async fn resolve_candidate<R: PivotCandidateResolver>(
    resolver: &R,
    episode: &SearchEpisode,
) -> Result<BlockHeader> {
    let context = resolver
        .wait_for_suitable_peers(NegotiationContext::empty())
        .await
        .context("waiting for suitable peers")?;
    episode.advance(CandidateSearch::SelectingHeight);

    let context = resolver
        .select_pivot_block(context)
        .await
        .context("selecting pivot block")?;
    let number = context
        .pivot_block_number()
        .context("resolver selected no pivot block number")?;
    episode.advance(CandidateSearch::DownloadingHeader { number });

    let header = resolver
        .download_pivot_block_header(context)
        .await
        .context("downloading pivot block header")?
        .into_pivot_block_header()
        .context("resolver returned no pivot block header")?;
    ensure!(
        header.number == number,
        "downloaded header {} does not match selected pivot block {}",
        header.number,
        number
    );

    Ok(header)
}
