use super::*;
use crate::{protocol::ActionKind, Sequence};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, convert::Infallible};

/// An inscription event that has been applied, keyed by what happened to the
/// inscription. A transfer inscription is applied once when inscribed and once
/// when sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AppliedKey {
  pub inscription_id: InscriptionId,
  pub kind: ActionKind,
}

/// The whole ledger as an explicit value. Ordered maps keep iteration, and
/// therefore persistence and equality checks, deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
  tokens: BTreeMap<Tick, TokenInfo>,
  balances: BTreeMap<(ScriptKey, Tick), Balance>,
  transferable: BTreeMap<InscriptionId, TransferableLog>,
  applied: BTreeMap<AppliedKey, Sequence>,
  last_sequence: Option<Sequence>,
}

impl LedgerState {
  pub fn last_sequence(&self) -> Option<Sequence> {
    self.last_sequence
  }

  pub fn is_applied(&self, key: &AppliedKey) -> bool {
    self.applied.contains_key(key)
  }

  /// Sum of every holder's available and transferable amount of `tick`.
  pub fn circulating(&self, tick: &Tick) -> u128 {
    self
      .balances
      .iter()
      .filter(|((_, t), _)| t == tick)
      .map(|(_, balance)| balance.overall())
      .sum()
  }

  pub fn tokens(&self) -> impl Iterator<Item = (&Tick, &TokenInfo)> {
    self.tokens.iter()
  }

  pub fn balances(&self) -> impl Iterator<Item = (&ScriptKey, &Tick, &Balance)> {
    self
      .balances
      .iter()
      .map(|((script, tick), balance)| (script, tick, balance))
  }

  pub fn transferables(&self) -> impl Iterator<Item = &TransferableLog> {
    self.transferable.values()
  }

  pub fn applied(&self) -> impl Iterator<Item = (&AppliedKey, &Sequence)> {
    self.applied.iter()
  }

  pub(crate) fn mark_applied(&mut self, key: AppliedKey, sequence: Sequence) {
    self.applied.insert(key, sequence);
    self.last_sequence = Some(sequence);
  }

  pub(crate) fn unmark_applied(&mut self, key: &AppliedKey, previous: Option<Sequence>) {
    self.applied.remove(key);
    self.last_sequence = previous;
  }

  pub(crate) fn restore_token(&mut self, tick: &Tick, prev: Option<TokenInfo>) {
    match prev {
      Some(info) => self.tokens.insert(tick.clone(), info),
      None => self.tokens.remove(tick),
    };
  }

  pub(crate) fn restore_balance(&mut self, script: &ScriptKey, tick: &Tick, prev: Option<Balance>) {
    let key = (script.clone(), tick.clone());
    match prev {
      Some(balance) => self.balances.insert(key, balance),
      None => self.balances.remove(&key),
    };
  }

  pub(crate) fn restore_transferable(
    &mut self,
    inscription_id: &InscriptionId,
    prev: Option<TransferableLog>,
  ) {
    match prev {
      Some(log) => self.transferable.insert(*inscription_id, log),
      None => self.transferable.remove(inscription_id),
    };
  }

  pub(crate) fn restore_applied(&mut self, key: AppliedKey, sequence: Sequence) {
    self.applied.insert(key, sequence);
  }

  pub(crate) fn restore_last_sequence(&mut self, sequence: Option<Sequence>) {
    self.last_sequence = sequence;
  }
}

impl Brc20Reader for LedgerState {
  type Error = Infallible;

  fn get_balances(&self, script_key: &ScriptKey) -> Result<Vec<Balance>, Self::Error> {
    Ok(
      self
        .balances
        .iter()
        .filter(|((script, _), _)| script == script_key)
        .map(|(_, balance)| balance.clone())
        .collect(),
    )
  }

  fn get_balance(
    &self,
    script_key: &ScriptKey,
    tick: &Tick,
  ) -> Result<Option<Balance>, Self::Error> {
    Ok(
      self
        .balances
        .get(&(script_key.clone(), tick.clone()))
        .cloned(),
    )
  }

  fn get_token_info(&self, tick: &Tick) -> Result<Option<TokenInfo>, Self::Error> {
    Ok(self.tokens.get(tick).cloned())
  }

  fn get_tokens_info(&self) -> Result<Vec<TokenInfo>, Self::Error> {
    Ok(self.tokens.values().cloned().collect())
  }

  fn get_transferable(&self, script: &ScriptKey) -> Result<Vec<TransferableLog>, Self::Error> {
    Ok(
      self
        .transferable
        .values()
        .filter(|log| &log.owner == script)
        .cloned()
        .collect(),
    )
  }

  fn get_transferable_by_id(
    &self,
    inscription_id: &InscriptionId,
  ) -> Result<Option<TransferableLog>, Self::Error> {
    Ok(self.transferable.get(inscription_id).cloned())
  }
}

impl Brc20ReaderWriter for LedgerState {
  fn update_token_balance(
    &mut self,
    script_key: &ScriptKey,
    tick: &Tick,
    new_balance: Balance,
  ) -> Result<(), Self::Error> {
    self
      .balances
      .insert((script_key.clone(), tick.clone()), new_balance);
    Ok(())
  }

  fn insert_token_info(&mut self, tick: &Tick, new_info: &TokenInfo) -> Result<(), Self::Error> {
    self.tokens.insert(tick.clone(), new_info.clone());
    Ok(())
  }

  fn update_mint_token_info(
    &mut self,
    tick: &Tick,
    minted_amt: u128,
    minted_block_number: u64,
  ) -> Result<(), Self::Error> {
    if let Some(info) = self.tokens.get_mut(tick) {
      info.minted = minted_amt;
      info.latest_mint_number = minted_block_number;
    }
    Ok(())
  }

  fn insert_transferable(&mut self, inscription: TransferableLog) -> Result<(), Self::Error> {
    self
      .transferable
      .entry(inscription.inscription_id)
      .or_insert(inscription);
    Ok(())
  }

  fn remove_transferable(&mut self, inscription_id: &InscriptionId) -> Result<(), Self::Error> {
    self.transferable.remove(inscription_id);
    Ok(())
  }
}
