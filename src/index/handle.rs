use crate::{datastore::brc20::LedgerState, Sequence};
use std::sync::{Arc, PoisonError, RwLock};

/// Read side of an `Indexer`. Cheap to clone and safe to move to other
/// threads; every snapshot is the ledger as of the last published sequence.
#[derive(Debug, Clone)]
pub struct LedgerHandle {
  pub(super) published: Arc<RwLock<Arc<LedgerState>>>,
}

impl LedgerHandle {
  pub fn snapshot(&self) -> Arc<LedgerState> {
    self
      .published
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  pub fn last_sequence(&self) -> Option<Sequence> {
    self.snapshot().last_sequence()
  }

  pub(super) fn publish(&self, state: Arc<LedgerState>) {
    *self
      .published
      .write()
      .unwrap_or_else(PoisonError::into_inner) = state;
  }
}
