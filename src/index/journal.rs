use crate::{
  datastore::{
    brc20::{
      AppliedKey, Balance, Brc20Reader, Brc20ReaderWriter, LedgerState, Tick, TokenInfo,
      TransferableLog,
    },
    ScriptKey,
  },
  InscriptionId, Sequence,
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

/// The value a key held before a write. `None` means the key was absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Change {
  Balance {
    script: ScriptKey,
    tick: Tick,
    prev: Option<Balance>,
  },
  Token {
    tick: Tick,
    prev: Option<TokenInfo>,
  },
  Transferable {
    inscription_id: InscriptionId,
    prev: Option<TransferableLog>,
  },
}

impl Change {
  fn revert(&self, state: &mut LedgerState) {
    match self {
      Change::Balance { script, tick, prev } => state.restore_balance(script, tick, prev.clone()),
      Change::Token { tick, prev } => state.restore_token(tick, prev.clone()),
      Change::Transferable {
        inscription_id,
        prev,
      } => state.restore_transferable(inscription_id, prev.clone()),
    }
  }
}

/// Everything needed to take one applied record back out of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoEntry {
  pub sequence: Sequence,
  pub applied: AppliedKey,
  pub prev_sequence: Option<Sequence>,
  pub changes: Vec<Change>,
}

impl UndoEntry {
  pub(crate) fn revert(&self, state: &mut LedgerState) {
    for change in self.changes.iter().rev() {
      change.revert(state);
    }
    state.unmark_applied(&self.applied, self.prev_sequence);
  }
}

/// Ledger writer that remembers the previous value of every key it touches.
#[derive(Debug)]
pub(crate) struct JournaledLedger<'a> {
  state: &'a mut LedgerState,
  changes: Vec<Change>,
}

impl<'a> JournaledLedger<'a> {
  pub(crate) fn new(state: &'a mut LedgerState) -> Self {
    Self {
      state,
      changes: Vec::new(),
    }
  }

  pub(crate) fn into_changes(self) -> Vec<Change> {
    self.changes
  }

  /// Undoes every write made through this ledger.
  pub(crate) fn rollback(self) {
    let Self { state, changes } = self;
    for change in changes.iter().rev() {
      change.revert(state);
    }
  }
}

impl<'a> Brc20Reader for JournaledLedger<'a> {
  type Error = Infallible;

  fn get_balances(&self, script_key: &ScriptKey) -> Result<Vec<Balance>, Self::Error> {
    self.state.get_balances(script_key)
  }

  fn get_balance(
    &self,
    script_key: &ScriptKey,
    tick: &Tick,
  ) -> Result<Option<Balance>, Self::Error> {
    self.state.get_balance(script_key, tick)
  }

  fn get_token_info(&self, tick: &Tick) -> Result<Option<TokenInfo>, Self::Error> {
    self.state.get_token_info(tick)
  }

  fn get_tokens_info(&self) -> Result<Vec<TokenInfo>, Self::Error> {
    self.state.get_tokens_info()
  }

  fn get_transferable(&self, script: &ScriptKey) -> Result<Vec<TransferableLog>, Self::Error> {
    self.state.get_transferable(script)
  }

  fn get_transferable_by_id(
    &self,
    inscription_id: &InscriptionId,
  ) -> Result<Option<TransferableLog>, Self::Error> {
    self.state.get_transferable_by_id(inscription_id)
  }
}

impl<'a> Brc20ReaderWriter for JournaledLedger<'a> {
  fn update_token_balance(
    &mut self,
    script_key: &ScriptKey,
    tick: &Tick,
    new_balance: Balance,
  ) -> Result<(), Self::Error> {
    self.changes.push(Change::Balance {
      script: script_key.clone(),
      tick: tick.clone(),
      prev: self.state.get_balance(script_key, tick)?,
    });
    self.state.update_token_balance(script_key, tick, new_balance)
  }

  fn insert_token_info(&mut self, tick: &Tick, new_info: &TokenInfo) -> Result<(), Self::Error> {
    self.changes.push(Change::Token {
      tick: tick.clone(),
      prev: self.state.get_token_info(tick)?,
    });
    self.state.insert_token_info(tick, new_info)
  }

  fn update_mint_token_info(
    &mut self,
    tick: &Tick,
    minted_amt: u128,
    minted_block_number: u64,
  ) -> Result<(), Self::Error> {
    self.changes.push(Change::Token {
      tick: tick.clone(),
      prev: self.state.get_token_info(tick)?,
    });
    self
      .state
      .update_mint_token_info(tick, minted_amt, minted_block_number)
  }

  fn insert_transferable(&mut self, inscription: TransferableLog) -> Result<(), Self::Error> {
    self.changes.push(Change::Transferable {
      inscription_id: inscription.inscription_id,
      prev: self
        .state
        .get_transferable_by_id(&inscription.inscription_id)?,
    });
    self.state.insert_transferable(inscription)
  }

  fn remove_transferable(&mut self, inscription_id: &InscriptionId) -> Result<(), Self::Error> {
    self.changes.push(Change::Transferable {
      inscription_id: *inscription_id,
      prev: self.state.get_transferable_by_id(inscription_id)?,
    });
    self.state.remove_transferable(inscription_id)
  }
}
