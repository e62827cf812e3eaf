//! Recent-block history.
//!
//! Keeps the most recent blocks of an append-only chain in a fixed-size
//! [`SlidingWindow`] behind a lock, so a single chain follower can append
//! while any number of readers query by sequence number. Blocks older than
//! the window are evicted and queries for them return `None` rather than
//! stale data.
//!
//! The window itself treats protocol misuse as fatal; this layer checks the
//! one misuse external input can plausibly produce, an out-of-order sequence
//! number, up front and reports it as a recoverable error.

use std::sync::{Arc, RwLock};

use chain_window::SlidingWindow;

/// Configuration for the recent-block history.
#[derive(Debug, Clone)]
pub struct BlockHistoryConfig {
    /// Maximum number of blocks kept before the oldest is evicted.
    pub window_size: usize,
}

impl Default for BlockHistoryConfig {
    fn default() -> Self {
        Self { window_size: 1024 }
    }
}

/// Error type for sequence-number protocol violations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BlockHistoryError {
    #[error("non-sequential block: expected sequence number {expected}, got {got}")]
    NonSequential { expected: u64, got: u64 },
}

/// Shared history of the most recent blocks of a sequential feed.
///
/// Cloning the handle is cheap; all clones see the same history. Appends
/// take the lock exclusively, reads share it, so a reader never observes a
/// half-applied eviction.
#[derive(Clone)]
pub struct BlockHistory<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    window: RwLock<SlidingWindow<T>>,
    config: BlockHistoryConfig,
}

impl<T> std::fmt::Debug for BlockHistory<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let window = self.inner.window.read().unwrap();
        f.debug_struct("BlockHistory")
            .field("len", &window.size())
            .field("config", &self.inner.config)
            .finish()
    }
}

impl<T> BlockHistory<T> {
    /// Creates a new history with the given configuration.
    ///
    /// Returns an error if the configured window size is zero.
    pub fn new(config: BlockHistoryConfig) -> Result<Self, anyhow::Error> {
        if config.window_size == 0 {
            anyhow::bail!("history window size must be non-zero");
        }
        Ok(Self {
            inner: Arc::new(Inner {
                window: RwLock::new(SlidingWindow::with_capacity(config.window_size)),
                config,
            }),
        })
    }

    /// Total number of blocks ever appended; also the next sequence number.
    pub fn len(&self) -> u64 {
        self.inner.window.read().unwrap().size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First sequence number still retained.
    pub fn window_start(&self) -> u64 {
        self.inner.window.read().unwrap().window_start()
    }

    /// Number of blocks kept before eviction sets in.
    pub fn window_size(&self) -> usize {
        self.inner.config.window_size
    }

    /// Whether the block at `seq` is still retained.
    pub fn contains(&self, seq: u64) -> bool {
        self.inner.window.read().unwrap().contains(seq)
    }

    /// Appends `block` at the next sequence number and returns that number.
    pub fn append(&self, block: T) -> u64 {
        let mut window = self.inner.window.write().unwrap();
        let seq = window.size();
        push(&mut window, seq, block);
        seq
    }

    /// Appends `block` claiming sequence number `seq`.
    ///
    /// Blocks must arrive in sequence order. Returns an error if `seq` is
    /// not the next expected number; the history is left untouched.
    pub fn append_at(&self, seq: u64, block: T) -> Result<u64, BlockHistoryError> {
        let mut window = self.inner.window.write().unwrap();
        let expected = window.size();
        if seq != expected {
            return Err(BlockHistoryError::NonSequential { expected, got: seq });
        }
        push(&mut window, seq, block);
        Ok(seq)
    }
}

impl<T: Clone> BlockHistory<T> {
    /// Returns the block at `seq`, or `None` if it was never appended or has
    /// been evicted.
    pub fn get(&self, seq: u64) -> Option<T> {
        let window = self.inner.window.read().unwrap();
        window.contains(seq).then(|| window[seq].clone())
    }

    /// The most recently appended block, if any.
    pub fn latest(&self) -> Option<T> {
        let window = self.inner.window.read().unwrap();
        (!window.is_empty()).then(|| window.back().clone())
    }

    /// Up to `n` most recent blocks, oldest first.
    pub fn latest_n(&self, n: usize) -> Vec<T> {
        let window = self.inner.window.read().unwrap();
        let mut blocks: Vec<T> = window
            .iter()
            .rev()
            .take(n)
            .map(|(_, block)| block.clone())
            .collect();
        blocks.reverse();
        blocks
    }
}

fn push<T>(window: &mut SlidingWindow<T>, seq: u64, block: T) {
    if seq >= window.capacity() as u64 {
        tracing::debug!(
            "Evicting block {} from history at sequence number {}",
            seq - window.capacity() as u64,
            seq
        );
    }
    window.append(seq, block);
}
