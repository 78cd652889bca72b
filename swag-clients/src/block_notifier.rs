//! New-block notifications.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace, warn};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::chain_reader::ChainReader;

const CHANNEL_CAPACITY: usize = 16;

/// Fans block numbers out to every live subscription.
#[derive(Debug, Clone)]
pub struct BlockNotifier {
  sender: broadcast::Sender<u64>,
  registered: Arc<AtomicUsize>,
}

impl Default for BlockNotifier {
  fn default() -> Self {
    BlockNotifier::new()
  }
}

impl BlockNotifier {
  #[must_use]
  pub fn new() -> BlockNotifier {
    let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
    BlockNotifier {
      sender,
      registered: Arc::new(AtomicUsize::new(0)),
    }
  }

  /// Registers an observer; dropping the subscription unregisters it.
  #[must_use]
  pub fn subscribe(&self) -> BlockSubscription {
    self.registered.fetch_add(1, Ordering::SeqCst);
    BlockSubscription {
      receiver: self.sender.subscribe(),
      registered: self.registered.clone(),
    }
  }

  /// Publishes `block` and returns how many subscriptions received it.
  pub fn publish(&self, block: u64) -> usize {
    trace!("block {block}");
    self.sender.send(block).unwrap_or(0)
  }

  #[must_use]
  pub fn subscriber_count(&self) -> usize {
    self.registered.load(Ordering::SeqCst)
  }

  /// Polls `reader` every `interval` and publishes each block number higher
  /// than the last one seen. Read failures are logged and retried on the
  /// next tick.
  pub fn poll<R>(&self, reader: R, interval: Duration) -> JoinHandle<()>
  where
    R: ChainReader + 'static,
  {
    let notifier = self.clone();
    tokio::spawn(async move {
      let mut ticker = tokio::time::interval(interval);
      ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
      let mut last_seen: Option<u64> = None;
      loop {
        ticker.tick().await;
        match reader.block_number().await {
          Ok(block) if last_seen.is_none_or(|last| block > last) => {
            last_seen = Some(block);
            let delivered = notifier.publish(block);
            debug!("new block {block} delivered to {delivered} watchers");
          }
          Ok(_) => {}
          Err(e) => warn!("block poll failed: {e:#}"),
        }
      }
    })
  }
}

/// Scoped registration with a [`BlockNotifier`].
#[derive(Debug)]
pub struct BlockSubscription {
  receiver: broadcast::Receiver<u64>,
  registered: Arc<AtomicUsize>,
}

impl BlockSubscription {
  /// Waits for the next block. Lagged subscriptions skip to the newest
  /// block; `None` once the notifier is gone.
  pub async fn next(&mut self) -> Option<u64> {
    loop {
      match self.receiver.recv().await {
        Ok(block) => return Some(block),
        Err(RecvError::Lagged(skipped)) => {
          debug!("subscription lagged by {skipped} blocks");
        }
        Err(RecvError::Closed) => return None,
      }
    }
  }
}

impl Drop for BlockSubscription {
  fn drop(&mut self) {
    self.registered.fetch_sub(1, Ordering::SeqCst);
  }
}
