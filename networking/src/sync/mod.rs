//! Snap/fast sync pivot management.
//!
//! A snap or fast sync downloads the world state of one block, the pivot.
//! This module keeps that pivot close to the moving chain head. It includes:
//!
//! - **Chain Head Tracker**: Best chain height announced by connected peers
//! - **Download State**: The active pivot, published to request schedulers
//! - **Candidate Resolver**: Peer-facing steps that produce a new pivot header
//! - **Pivot Manager**: Detects a stale pivot and switches to a fresh one
//!
//! ## State Machine
//!
//! - **IDLE**: No search running
//! - **AWAITING_PEERS -> SELECTING_HEIGHT -> DOWNLOADING_HEADER**: One search
//!   episode in flight
//! - **READY**: Candidate downloaded, waiting for the head to reach it

pub mod chain_head;
pub mod config;
pub mod download_state;
pub mod pivot_manager;
pub mod resolver;
pub mod states;

pub use chain_head::{ChainHeadTracker, ChainHeightOracle, PeerChainHead};
pub use config::*;
pub use download_state::{DownloadStateStore, PivotRecord, WorldDownloadState};
pub use pivot_manager::{DynamicPivotBlockManager, PivotCheck};
pub use resolver::{NegotiationContext, PivotCandidateResolver};
pub use states::CandidateSearch;
