use super::{Error, Indexer, UndoEntry};
use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

impl Indexer {
  /// Takes every record at `height` or above back out of the ledger, newest
  /// first, and returns the unwound journal entries.
  ///
  /// The unwind runs on a private copy and only replaces the state once it
  /// completed. Raising `cancel` or hitting the pruned part of the journal
  /// leaves the indexer untouched.
  pub fn unwind_to(&mut self, height: u64, cancel: &AtomicBool) -> Result<Vec<UndoEntry>, Error> {
    if let Some(pruned) = self.pruned_height {
      if pruned >= height {
        return Err(Error::ReorgTooDeep { height, pruned });
      }
    }

    let split = self
      .journal
      .partition_point(|entry| entry.sequence.height < height);

    log::info!(
      "Unwinding {} records down to height {height}",
      self.journal.len() - split
    );

    let mut working = self.state.as_ref().clone();
    for entry in self.journal[split..].iter().rev() {
      if cancel.load(Ordering::Relaxed) {
        log::warn!("Unwind to height {height} cancelled, ledger left unchanged");
        return Err(Error::Cancelled);
      }
      entry.revert(&mut working);
    }

    let unwound = self.journal.split_off(split);
    self.state = Arc::new(working);
    self.publish();

    log::info!(
      "Ledger unwound to {}",
      self
        .state
        .last_sequence()
        .map(|sequence| sequence.to_string())
        .unwrap_or_else(|| "genesis".into())
    );

    Ok(unwound)
  }
}
