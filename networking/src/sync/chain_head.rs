//! Chain head tracking across peers.
//!
//! Peers announce new blocks with `NewBlockHashes`. The highest announced
//! number per connected peer, together with the local chain height, gives the
//! best known chain height the pivot manager compares its pivot against.
use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use containers::BlockNumber;
use libp2p_identity::PeerId;
use parking_lot::RwLock;
use tracing::debug;

use crate::{
    messages::{MessageError, NewBlockHash, NewBlockHashesMessage},
    types::ConnectionState,
};

/// Source of the best chain height observed across connected peers.
pub trait ChainHeightOracle: Send + Sync + 'static {
    fn best_chain_height(&self) -> BlockNumber;
}

/// Chain head announced by one peer.
#[derive(Debug, Clone)]
pub struct PeerChainHead {
    pub peer_id: PeerId,
    pub connection_state: ConnectionState,
    pub best_block: Option<NewBlockHash>,
}

impl PeerChainHead {
    pub fn new(peer_id: PeerId, connection_state: ConnectionState) -> Self {
        Self {
            peer_id,
            connection_state,
            best_block: None,
        }
    }

    /// Check if peer is connected.
    pub fn is_connected(&self) -> bool {
        self.connection_state == ConnectionState::Connected
    }

    pub fn best_number(&self) -> Option<BlockNumber> {
        self.best_block.map(|block| block.number)
    }

    /// Records an announcement, returning whether it raised this peer's head.
    pub fn on_announcement(&mut self, announced: NewBlockHash) -> bool {
        if self
            .best_number()
            .is_some_and(|best| best >= announced.number)
        {
            return false;
        }
        self.best_block = Some(announced);
        true
    }
}

/// Best chain height estimate shared between the eth message handlers and
/// the sync loop.
#[derive(Debug, Default)]
pub struct ChainHeadTracker {
    peers: RwLock<HashMap<PeerId, PeerChainHead>>,
    local_height: AtomicU64,
}

impl ChainHeadTracker {
    pub fn new(local_height: BlockNumber) -> Self {
        Self {
            peers: RwLock::default(),
            local_height: AtomicU64::new(local_height),
        }
    }

    /// Add a peer to the tracker.
    pub fn add_peer(&self, peer_id: PeerId, connection_state: ConnectionState) {
        self.peers
            .write()
            .entry(peer_id)
            .or_insert_with(|| PeerChainHead::new(peer_id, connection_state));
    }

    /// Remove a peer from the tracker.
    pub fn remove_peer(&self, peer_id: &PeerId) -> Option<PeerChainHead> {
        self.peers.write().remove(peer_id)
    }

    /// Update peer connection state.
    pub fn update_connection_state(&self, peer_id: &PeerId, state: ConnectionState) {
        if let Some(peer) = self.peers.write().get_mut(peer_id) {
            peer.connection_state = state;
        }
    }

    pub fn update_local_height(&self, height: BlockNumber) {
        self.local_height.fetch_max(height, Ordering::AcqRel);
    }

    /// Record a single announced block. Announcements from unknown peers are ignored.
    pub fn on_block_announced(&self, peer_id: &PeerId, announced: NewBlockHash) -> bool {
        let mut peers = self.peers.write();
        let Some(peer) = peers.get_mut(peer_id) else {
            debug!(peer = %peer_id, number = announced.number, "Ignoring announcement from unknown peer");
            return false;
        };
        peer.on_announcement(announced)
    }

    /// Record every pair of a `NewBlockHashes` message.
    ///
    /// Returns the peer's new best height if the message raised it. A
    /// malformed message is rejected as a whole before anything is recorded.
    pub fn on_new_block_hashes(
        &self,
        peer_id: &PeerId,
        message: &NewBlockHashesMessage,
    ) -> Result<Option<BlockNumber>, MessageError> {
        let Some(highest) = message.highest()? else {
            return Ok(None);
        };

        if !self.on_block_announced(peer_id, highest) {
            return Ok(None);
        }

        debug!(
            peer = %peer_id,
            number = highest.number,
            hash = %highest.hash,
            "Peer chain head advanced"
        );
        Ok(Some(highest.number))
    }

    /// Get a peer's chain head by ID.
    pub fn get_peer(&self, peer_id: &PeerId) -> Option<PeerChainHead> {
        self.peers.read().get(peer_id).cloned()
    }

    pub fn connected_peers(&self) -> usize {
        self.peers
            .read()
            .values()
            .filter(|peer| peer.is_connected())
            .count()
    }
}

impl ChainHeightOracle for ChainHeadTracker {
    fn best_chain_height(&self) -> BlockNumber {
        let best_peer = self
            .peers
            .read()
            .values()
            .filter(|peer| peer.is_connected())
            .filter_map(PeerChainHead::best_number)
            .max()
            .unwrap_or_default();

        best_peer.max(self.local_height.load(Ordering::Acquire))
    }
}
