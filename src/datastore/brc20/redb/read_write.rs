use super::*;
use crate::{
  datastore::brc20::{LedgerState, Receipt},
  index::UndoEntry,
  protocol::Policy,
  Result,
};
use redb::{ReadableTable, TableDefinition, WriteTransaction};

pub struct DataStore<'db, 'a> {
  wtx: &'a WriteTransaction<'db>,
}

impl<'db, 'a> DataStore<'db, 'a> {
  pub fn new(wtx: &'a WriteTransaction<'db>) -> Self {
    Self { wtx }
  }

  /// Creates every table so later read transactions never miss one.
  pub fn init_tables(&self) -> Result {
    self.wtx.open_table(BRC20_BALANCES)?;
    self.wtx.open_table(BRC20_TOKEN)?;
    self.wtx.open_table(BRC20_EVENTS)?;
    self.wtx.open_table(BRC20_TRANSFERABLELOG)?;
    self.wtx.open_table(BRC20_APPLIED)?;
    self.wtx.open_table(BRC20_JOURNAL)?;
    self.wtx.open_table(BRC20_STATISTIC)?;
    Ok(())
  }

  /// Replaces the stored ledger with `state`, built under `policy`. Callers
  /// commit the surrounding write transaction, so readers observe either the
  /// old or the new ledger.
  pub fn save_snapshot(
    &self,
    policy: &Policy,
    state: &LedgerState,
    journal: &[UndoEntry],
    pruned_height: Option<u64>,
  ) -> Result {
    self.clear_table(BRC20_TOKEN)?;
    {
      let mut table = self.wtx.open_table(BRC20_TOKEN)?;
      for (tick, info) in state.tokens() {
        table.insert(tick.hex().as_str(), bincode::serialize(info)?.as_slice())?;
      }
    }

    self.clear_table(BRC20_BALANCES)?;
    {
      let mut table = self.wtx.open_table(BRC20_BALANCES)?;
      for (script, tick, balance) in state.balances() {
        table.insert(
          script_tick_key(script, tick).as_str(),
          bincode::serialize(balance)?.as_slice(),
        )?;
      }
    }

    self.clear_table(BRC20_TRANSFERABLELOG)?;
    {
      let mut table = self.wtx.open_table(BRC20_TRANSFERABLELOG)?;
      for log in state.transferables() {
        table.insert(
          log.inscription_id.to_string().as_str(),
          bincode::serialize(log)?.as_slice(),
        )?;
      }
    }

    self.clear_table(BRC20_APPLIED)?;
    {
      let mut table = self.wtx.open_table(BRC20_APPLIED)?;
      for (key, sequence) in state.applied() {
        table.insert(
          format!("{}:{:?}", key.inscription_id, key.kind).as_str(),
          bincode::serialize(&(key, sequence))?.as_slice(),
        )?;
      }
    }

    self.clear_table(BRC20_JOURNAL)?;
    {
      let mut table = self.wtx.open_table(BRC20_JOURNAL)?;
      for entry in journal {
        table.insert(
          entry.sequence.store_key().as_str(),
          bincode::serialize(entry)?.as_slice(),
        )?;
      }
    }

    let mut statistic = self.wtx.open_table(BRC20_STATISTIC)?;
    statistic.insert(
      LAST_SEQUENCE,
      bincode::serialize(&state.last_sequence())?.as_slice(),
    )?;
    statistic.insert(
      PRUNED_HEIGHT,
      bincode::serialize(&pruned_height)?.as_slice(),
    )?;
    statistic.insert(POLICY, bincode::serialize(&Some(*policy))?.as_slice())?;

    Ok(())
  }

  pub fn add_receipts(&self, receipts: &[Receipt]) -> Result {
    let mut table = self.wtx.open_table(BRC20_EVENTS)?;
    for receipt in receipts {
      let key = receipt.inscription_id.to_string();
      let mut stored = match table.get(key.as_str())? {
        Some(v) => bincode::deserialize::<Vec<Receipt>>(v.value())?,
        None => Vec::new(),
      };
      stored.push(receipt.clone());
      table.insert(key.as_str(), bincode::serialize(&stored)?.as_slice())?;
    }
    Ok(())
  }

  /// Drops the receipts produced by unwound journal entries.
  pub fn remove_receipts(&self, orphaned: &[UndoEntry]) -> Result {
    let mut table = self.wtx.open_table(BRC20_EVENTS)?;
    for entry in orphaned {
      let key = entry.applied.inscription_id.to_string();
      let mut stored = match table.get(key.as_str())? {
        Some(v) => bincode::deserialize::<Vec<Receipt>>(v.value())?,
        None => continue,
      };
      stored.retain(|receipt| receipt.sequence != entry.sequence);
      if stored.is_empty() {
        table.remove(key.as_str())?;
      } else {
        table.insert(key.as_str(), bincode::serialize(&stored)?.as_slice())?;
      }
    }
    Ok(())
  }

  fn clear_table(
    &self,
    definition: TableDefinition<'static, &'static str, &'static [u8]>,
  ) -> Result {
    let mut table = self.wtx.open_table(definition)?;
    let keys = table
      .iter()?
      .map(|result| result.map(|(key, _)| key.value().to_string()))
      .collect::<Result<Vec<String>, redb::StorageError>>()?;
    for key in keys {
      table.remove(key.as_str())?;
    }
    Ok(())
  }
}
