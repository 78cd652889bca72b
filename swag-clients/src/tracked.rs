//! Staleness-guarded values fed by asynchronous reads.
//!
//! A [`Tracked`] value hands out a [`Ticket`] per read. Committing a result
//! succeeds only while its ticket is the latest one issued, so a slow read
//! that was superseded can never overwrite a fresher one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Observed state of a chain read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fetched<T> {
  /// Nothing fetched yet, or the previous value was invalidated.
  #[default]
  Pending,
  /// The latest read failed.
  Failed,
  Ready(T),
}

impl<T> Fetched<T> {
  #[must_use]
  pub fn ready(&self) -> Option<&T> {
    match self {
      Fetched::Ready(value) => Some(value),
      Fetched::Pending | Fetched::Failed => None,
    }
  }

  #[must_use]
  pub fn is_pending(&self) -> bool {
    matches!(self, Fetched::Pending)
  }

  #[must_use]
  pub fn is_failed(&self) -> bool {
    matches!(self, Fetched::Failed)
  }

  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
    match self {
      Fetched::Pending => Fetched::Pending,
      Fetched::Failed => Fetched::Failed,
      Fetched::Ready(value) => Fetched::Ready(f(value)),
    }
  }
}

impl<T: Copy> Fetched<T> {
  #[must_use]
  pub fn value(&self) -> Option<T> {
    self.ready().copied()
  }
}

impl<T, E> From<Result<T, E>> for Fetched<T> {
  fn from(result: Result<T, E>) -> Self {
    result.map_or(Fetched::Failed, Fetched::Ready)
  }
}

/// Marker for one issued read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// A watched value with a generation counter.
#[derive(Debug)]
pub struct Tracked<T> {
  state: watch::Sender<Fetched<T>>,
  generation: AtomicU64,
}

impl<T> Tracked<T> {
  #[must_use]
  pub fn new() -> Arc<Tracked<T>> {
    let (state, _) = watch::channel(Fetched::Pending);
    Arc::new(Tracked {
      state,
      generation: AtomicU64::new(0),
    })
  }

  /// Issues a ticket, superseding every earlier one.
  pub fn begin(&self) -> Ticket {
    Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
  }

  /// Stores `value` if `ticket` is still the latest. Returns whether the
  /// value was committed.
  pub fn commit(&self, ticket: Ticket, value: Fetched<T>) -> bool {
    let mut value = Some(value);
    self.state.send_if_modified(|state| {
      // checked under the channel lock so begin/commit pairs serialize
      if self.generation.load(Ordering::SeqCst) != ticket.0 {
        return false;
      }
      match value.take() {
        Some(value) => {
          *state = value;
          true
        }
        None => false,
      }
    })
  }

  /// Drops all in-flight reads and resets to [`Fetched::Pending`].
  pub fn invalidate(&self) {
    self.state.send_modify(|state| {
      self.generation.fetch_add(1, Ordering::SeqCst);
      *state = Fetched::Pending;
    });
  }

  #[must_use]
  pub fn subscribe(&self) -> watch::Receiver<Fetched<T>> {
    self.state.subscribe()
  }
}

impl<T: Clone> Tracked<T> {
  #[must_use]
  pub fn get(&self) -> Fetched<T> {
    self.state.borrow().clone()
  }
}
