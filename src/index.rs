use crate::{
  datastore::brc20::{AppliedKey, LedgerState, Receipt},
  protocol::{
    brc20::{self, execute, resolve_message, Policy},
    Action, InscriptionRecord,
  },
};
use std::sync::{Arc, RwLock};

mod error;
mod handle;
mod journal;
mod reorg;

pub use self::{
  error::Error,
  handle::LedgerHandle,
  journal::{Change, UndoEntry},
};
use self::journal::JournaledLedger;

/// Everything needed to resume indexing, as persisted by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
  pub state: LedgerState,
  pub journal: Vec<UndoEntry>,
  pub pruned_height: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
  /// Not a BRC-20 record. The ledger was not touched.
  Ignored,
  /// This inscription event was applied before; replaying it changes nothing.
  AlreadyApplied,
  Applied(Receipt),
}

/// The single writer of the ledger.
///
/// Records must arrive in canonical chain order. Each one is executed against
/// the working state and journaled so that a reorg can take it back out.
/// Readers only see what `publish` (called after every block) hands them.
pub struct Indexer {
  policy: Policy,
  max_reorg_depth: u64,
  state: Arc<LedgerState>,
  journal: Vec<UndoEntry>,
  pruned_height: Option<u64>,
  handle: LedgerHandle,
}

impl Indexer {
  pub fn new(policy: Policy, max_reorg_depth: u64) -> Self {
    Self::from_snapshot(
      policy,
      max_reorg_depth,
      Snapshot {
        state: LedgerState::default(),
        journal: Vec::new(),
        pruned_height: None,
      },
    )
  }

  pub fn from_snapshot(policy: Policy, max_reorg_depth: u64, snapshot: Snapshot) -> Self {
    let state = Arc::new(snapshot.state);
    Self {
      policy,
      max_reorg_depth,
      handle: LedgerHandle {
        published: Arc::new(RwLock::new(state.clone())),
      },
      state,
      journal: snapshot.journal,
      pruned_height: snapshot.pruned_height,
    }
  }

  pub fn handle(&self) -> LedgerHandle {
    self.handle.clone()
  }

  pub fn policy(&self) -> &Policy {
    &self.policy
  }

  pub fn state(&self) -> &LedgerState {
    &self.state
  }

  pub fn journal(&self) -> &[UndoEntry] {
    &self.journal
  }

  pub fn pruned_height(&self) -> Option<u64> {
    self.pruned_height
  }

  /// Applies a single record. Fatal errors leave the state exactly as it was
  /// before the call.
  pub fn apply(&mut self, record: &InscriptionRecord) -> Result<Outcome, Error> {
    let outcome = self.apply_record(record)?;
    if let Outcome::Applied(_) = outcome {
      self.prune_journal(record.sequence.height);
    }
    Ok(outcome)
  }

  /// Applies the records of one block and publishes the result. A fatal error
  /// discards the whole block, so the ledger and its readers stay at the end
  /// of the previous block.
  pub fn apply_block(&mut self, records: &[InscriptionRecord]) -> Result<Vec<Receipt>, Error> {
    let checkpoint = self.state.clone();
    let journaled = self.journal.len();

    let mut receipts = Vec::new();
    let mut ignored = 0;
    let mut duplicates = 0;

    for record in records {
      match self.apply_record(record) {
        Ok(Outcome::Applied(receipt)) => receipts.push(receipt),
        Ok(Outcome::Ignored) => ignored += 1,
        Ok(Outcome::AlreadyApplied) => duplicates += 1,
        Err(err) => {
          self.state = checkpoint;
          self.journal.truncate(journaled);
          log::warn!(
            "Discarded block {} after {} records: {err}",
            record.sequence.height,
            receipts.len() + ignored + duplicates
          );
          return Err(err);
        }
      }
    }

    if let Some(height) = records.last().map(|record| record.sequence.height) {
      self.prune_journal(height);
    }
    self.publish();

    if let Some(height) = records.first().map(|record| record.sequence.height) {
      log::info!(
        "Block {height}: {} applied, {ignored} ignored, {duplicates} duplicates",
        receipts.len()
      );
    }

    Ok(receipts)
  }

  /// Makes the current working state visible to every `LedgerHandle`.
  pub fn publish(&mut self) {
    self.handle.publish(self.state.clone());
  }

  fn apply_record(&mut self, record: &InscriptionRecord) -> Result<Outcome, Error> {
    let key = AppliedKey {
      inscription_id: record.inscription_id,
      kind: record.kind(),
    };

    if self.state.is_applied(&key) {
      log::debug!(
        "Skipping {:?} of {}: already applied",
        key.kind,
        key.inscription_id
      );
      return Ok(Outcome::AlreadyApplied);
    }

    // Records that are not BRC-20 never reach the ledger, so ordering does not
    // apply to them and replaying them stays harmless.
    let message = match resolve_message(self.state.as_ref(), record) {
      Ok(None) => return Ok(Outcome::Ignored),
      Ok(Some(message)) => Ok(message),
      Err(brc20::Error::BRC20Error(err)) => Err(err),
      Err(err) => {
        return Err(Error::Execution(format!(
          "{} at {}: {err}",
          record.inscription_id, record.sequence
        )))
      }
    };

    let prev_sequence = self.state.last_sequence();
    if let Some(last) = prev_sequence {
      if record.sequence <= last {
        return Err(Error::SequencingViolation {
          last,
          received: record.sequence,
        });
      }
    }

    let state = Arc::make_mut(&mut self.state);
    let mut ledger = JournaledLedger::new(state);

    let receipt = match message {
      Ok(message) => match execute(&mut ledger, &self.policy, &message) {
        Ok(receipt) => receipt,
        Err(err) => {
          ledger.rollback();
          return Err(Error::Execution(format!(
            "{} at {}: {err}",
            record.inscription_id, record.sequence
          )));
        }
      },
      Err(err) => Receipt {
        inscription_id: record.inscription_id,
        sequence: record.sequence,
        op: None,
        from: None,
        to: match &record.action {
          Action::Inscribe { owner, .. } => owner.clone(),
          Action::Send { to } => to.clone(),
        },
        result: Err(err),
      },
    };

    let changes = ledger.into_changes();
    state.mark_applied(key, record.sequence);

    if let Err(err) = &receipt.result {
      if err.is_benign() {
        log::debug!("{} at {}: {err}", record.inscription_id, record.sequence);
      } else {
        log::warn!(
          "Rejected {} at {}: {err}",
          record.inscription_id,
          record.sequence
        );
      }
    }

    self.journal.push(UndoEntry {
      sequence: record.sequence,
      applied: key,
      prev_sequence,
      changes,
    });

    Ok(Outcome::Applied(receipt))
  }

  fn prune_journal(&mut self, tip: u64) {
    let Some(cutoff) = tip.checked_sub(self.max_reorg_depth) else {
      return;
    };

    let split = self
      .journal
      .partition_point(|entry| entry.sequence.height <= cutoff);
    if split == 0 {
      return;
    }

    let pruned = self.journal[split - 1].sequence.height;
    self.journal.drain(..split);
    self.pruned_height = Some(self.pruned_height.map_or(pruned, |h| h.max(pruned)));

    log::debug!("Pruned journal through height {pruned}");
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    datastore::{
      brc20::{BRC20Error, Brc20Reader, Tick},
      ScriptKey,
    },
    InscriptionId, Sequence,
  };
  use std::str::FromStr;

  const ONE: u128 = 1_000_000_000_000_000_000;

  fn id(n: u32) -> InscriptionId {
    InscriptionId::from_str(&format!("{}i{n}", "1".repeat(64))).unwrap()
  }

  fn alice() -> ScriptKey {
    ScriptKey::from_address("bc1qalice")
  }

  fn deploy(height: u64, n: u32) -> InscriptionRecord {
    InscriptionRecord::inscribe(
      Sequence::new(height, n),
      id(n),
      alice(),
      r#"{"p":"brc-20","op":"deploy","tick":"MYTK","max":"21000000","lim":"1000"}"#,
    )
  }

  fn mint(height: u64, n: u32) -> InscriptionRecord {
    InscriptionRecord::inscribe(
      Sequence::new(height, n),
      id(n),
      alice(),
      r#"{"p":"brc-20","op":"mint","tick":"MYTK","amt":"1000"}"#,
    )
  }

  #[test]
  fn out_of_order_record_is_fatal() {
    let mut indexer = Indexer::new(Policy::default(), 6);
    indexer.apply(&deploy(2, 0)).unwrap();

    let before = indexer.state().clone();
    assert_eq!(
      indexer.apply(&mint(1, 1)),
      Err(Error::SequencingViolation {
        last: Sequence::new(2, 0),
        received: Sequence::new(1, 1),
      })
    );
    let mut same_slot = mint(2, 1);
    same_slot.sequence = Sequence::new(2, 0);
    assert_eq!(
      indexer.apply(&same_slot),
      Err(Error::SequencingViolation {
        last: Sequence::new(2, 0),
        received: Sequence::new(2, 0),
      })
    );
    assert_eq!(indexer.state(), &before);
    assert_eq!(indexer.journal().len(), 1);
  }

  #[test]
  fn replay_is_a_no_op() {
    let mut indexer = Indexer::new(Policy::default(), 6);
    indexer.apply(&deploy(1, 0)).unwrap();
    indexer.apply(&mint(1, 1)).unwrap();

    let before = indexer.state().clone();
    assert_eq!(indexer.apply(&deploy(1, 0)), Ok(Outcome::AlreadyApplied));
    assert_eq!(indexer.apply(&mint(1, 1)), Ok(Outcome::AlreadyApplied));
    assert_eq!(indexer.state(), &before);
    assert_eq!(indexer.journal().len(), 2);
  }

  #[test]
  fn replay_across_foreign_inscriptions() {
    let mut indexer = Indexer::new(Policy::default(), 6);
    let gm = InscriptionRecord::inscribe(Sequence::new(1, 1), id(1), alice(), "gm");
    let records = [deploy(1, 0), gm, mint(1, 2)];
    indexer.apply_block(&records).unwrap();

    let before = indexer.state().clone();
    assert_eq!(indexer.apply(&records[0]), Ok(Outcome::AlreadyApplied));
    assert_eq!(indexer.apply(&records[1]), Ok(Outcome::Ignored));
    assert_eq!(indexer.apply(&records[2]), Ok(Outcome::AlreadyApplied));
    assert_eq!(indexer.apply_block(&records), Ok(Vec::new()));
    assert_eq!(indexer.state(), &before);
  }

  #[test]
  fn fatal_error_discards_the_whole_block() {
    let mut indexer = Indexer::new(Policy::default(), 6);
    indexer.apply_block(&[deploy(5, 0)]).unwrap();
    let handle = indexer.handle();
    let before = indexer.state().clone();

    assert_eq!(
      indexer.apply_block(&[mint(6, 1), mint(4, 2)]),
      Err(Error::SequencingViolation {
        last: Sequence::new(6, 1),
        received: Sequence::new(4, 2),
      })
    );
    assert_eq!(indexer.state(), &before);
    assert_eq!(indexer.journal().len(), 1);
    assert_eq!(handle.last_sequence(), Some(Sequence::new(5, 0)));

    // The corrected block applies and yields the receipt.
    let receipts = indexer.apply_block(&[mint(6, 1)]).unwrap();
    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0].inscription_id, id(1));
    assert!(receipts[0].result.is_ok());
  }

  #[test]
  fn moving_a_plain_inscription_is_ignored() {
    let mut indexer = Indexer::new(Policy::default(), 6);
    indexer.apply(&deploy(1, 0)).unwrap();
    let before = indexer.state().clone();

    let send = InscriptionRecord::send(
      Sequence::new(2, 0),
      id(0),
      Some(ScriptKey::from_address("bc1qbob")),
    );
    assert_eq!(indexer.apply(&send), Ok(Outcome::Ignored));
    assert_eq!(indexer.state(), &before);
    assert_eq!(indexer.journal().len(), 1);
  }

  #[test]
  fn ignored_records_leave_state_alone() {
    let mut indexer = Indexer::new(Policy::default(), 6);
    let record = InscriptionRecord::inscribe(Sequence::new(1, 0), id(0), alice(), "gm");
    assert_eq!(indexer.apply(&record), Ok(Outcome::Ignored));
    assert_eq!(indexer.state(), &LedgerState::default());
    assert!(indexer.journal().is_empty());
  }

  #[test]
  fn malformed_brc20_gets_a_receipt() {
    let mut indexer = Indexer::new(Policy::default(), 6);
    let record = InscriptionRecord::inscribe(
      Sequence::new(1, 0),
      id(0),
      alice(),
      r#"{"p":"brc-20","op":"deploy"}"#,
    );
    let Ok(Outcome::Applied(receipt)) = indexer.apply(&record) else {
      panic!("malformed record should be applied as a rejection");
    };
    assert_eq!(receipt.op, None);
    assert!(matches!(receipt.result, Err(BRC20Error::MalformedInput(_))));
    assert_eq!(indexer.state().last_sequence(), Some(Sequence::new(1, 0)));
  }

  #[test]
  fn readers_see_published_state_only() {
    let mut indexer = Indexer::new(Policy::default(), 6);
    let handle = indexer.handle();
    let genesis = handle.snapshot();

    indexer.apply(&deploy(1, 0)).unwrap();
    indexer.apply(&mint(1, 1)).unwrap();
    assert_eq!(handle.last_sequence(), None);
    assert_eq!(*genesis, LedgerState::default());

    indexer.publish();
    let tick = Tick::from_str("mytk").unwrap();
    assert_eq!(
      handle
        .snapshot()
        .get_balance(&alice(), &tick)
        .unwrap()
        .unwrap()
        .available,
      1000 * ONE
    );

    let held = handle.snapshot();
    indexer.apply_block(&[mint(2, 2)]).unwrap();
    assert_eq!(held.circulating(&tick), 1000 * ONE);
    assert_eq!(handle.snapshot().circulating(&tick), 2000 * ONE);
    assert_eq!(*genesis, LedgerState::default());
  }

  #[test]
  fn journal_is_pruned_beyond_reorg_depth() {
    let mut indexer = Indexer::new(Policy::default(), 2);
    indexer.apply_block(&[deploy(10, 0)]).unwrap();
    indexer.apply_block(&[mint(11, 1)]).unwrap();
    indexer.apply_block(&[mint(12, 2)]).unwrap();
    assert_eq!(indexer.pruned_height(), Some(10));
    assert_eq!(indexer.journal().len(), 2);
    assert_eq!(indexer.journal()[0].sequence, Sequence::new(11, 1));
  }
}
