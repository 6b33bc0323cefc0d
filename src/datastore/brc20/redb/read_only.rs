use super::*;
use crate::{
  datastore::brc20::{
    AppliedKey, Balance, Brc20Reader, Brc20ReaderWriter, LedgerState, Receipt, TokenInfo,
    TransferableLog,
  },
  index::{Snapshot, UndoEntry},
  protocol::Policy,
  InscriptionId, Result, Sequence,
};
use anyhow::anyhow;
use redb::{ReadTransaction, ReadableTable};

pub struct DataStoreReader<'db, 'a> {
  rtx: &'a ReadTransaction<'db>,
}

impl<'db, 'a> DataStoreReader<'db, 'a> {
  pub fn new(rtx: &'a ReadTransaction<'db>) -> Self {
    Self { rtx }
  }

  pub fn get_receipts(&self, inscription_id: &InscriptionId) -> Result<Vec<Receipt>> {
    Ok(
      match self
        .rtx
        .open_table(BRC20_EVENTS)?
        .get(inscription_id.to_string().as_str())?
      {
        Some(v) => bincode::deserialize::<Vec<Receipt>>(v.value())?,
        None => Vec::new(),
      },
    )
  }

  pub fn last_sequence(&self) -> Result<Option<Sequence>> {
    self.statistic(LAST_SEQUENCE)
  }

  /// The policy the stored ledger was built under.
  pub fn policy(&self) -> Result<Option<Policy>> {
    self.statistic(POLICY)
  }

  fn statistic<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
    Ok(
      match self.rtx.open_table(BRC20_STATISTIC)?.get(key)? {
        Some(v) => bincode::deserialize::<Option<T>>(v.value())?,
        None => None,
      },
    )
  }

  /// Rebuilds the in-memory ledger. `None` when nothing was indexed yet.
  pub fn load_snapshot(&self) -> Result<Option<Snapshot>> {
    let Some(last_sequence) = self.last_sequence()? else {
      return Ok(None);
    };

    let mut state = LedgerState::default();

    for result in self.rtx.open_table(BRC20_TOKEN)?.iter()? {
      let (key, value) = result?;
      let tick = Tick::from_hex(key.value())
        .ok_or_else(|| anyhow!("corrupted token key `{}`", key.value()))?;
      let info = bincode::deserialize::<TokenInfo>(value.value())?;
      state
        .insert_token_info(&tick, &info)
        .map_err(|e| anyhow!("{e}"))?;
    }

    for result in self.rtx.open_table(BRC20_BALANCES)?.iter()? {
      let (key, value) = result?;
      let (script, tick) = parse_script_tick_key(key.value())
        .ok_or_else(|| anyhow!("corrupted balance key `{}`", key.value()))?;
      let balance = bincode::deserialize::<Balance>(value.value())?;
      state
        .update_token_balance(&script, &tick, balance)
        .map_err(|e| anyhow!("{e}"))?;
    }

    for result in self.rtx.open_table(BRC20_TRANSFERABLELOG)?.iter()? {
      let (_, value) = result?;
      state
        .insert_transferable(bincode::deserialize::<TransferableLog>(value.value())?)
        .map_err(|e| anyhow!("{e}"))?;
    }

    for result in self.rtx.open_table(BRC20_APPLIED)?.iter()? {
      let (_, value) = result?;
      let (key, sequence) = bincode::deserialize::<(AppliedKey, Sequence)>(value.value())?;
      state.restore_applied(key, sequence);
    }

    state.restore_last_sequence(Some(last_sequence));

    let mut journal = Vec::new();
    for result in self.rtx.open_table(BRC20_JOURNAL)?.iter()? {
      let (_, value) = result?;
      journal.push(bincode::deserialize::<UndoEntry>(value.value())?);
    }

    Ok(Some(Snapshot {
      state,
      journal,
      pruned_height: self.statistic(PRUNED_HEIGHT)?,
    }))
  }
}

impl<'db, 'a> Brc20Reader for DataStoreReader<'db, 'a> {
  type Error = anyhow::Error;

  fn get_balances(&self, script_key: &ScriptKey) -> Result<Vec<Balance>, Self::Error> {
    let mut balances = Vec::new();
    let table = self.rtx.open_table(BRC20_BALANCES)?;
    let min = min_script_tick_key(script_key);
    let max = max_script_tick_key(script_key);
    for result in table.range(min.as_str()..max.as_str())? {
      let (key, value) = result?;
      if parse_script_tick_key(key.value()).map(|(script, _)| script) != Some(script_key.clone()) {
        continue;
      }
      balances.push(bincode::deserialize::<Balance>(value.value())?);
    }
    Ok(balances)
  }

  fn get_balance(
    &self,
    script_key: &ScriptKey,
    tick: &Tick,
  ) -> Result<Option<Balance>, Self::Error> {
    Ok(
      match self
        .rtx
        .open_table(BRC20_BALANCES)?
        .get(script_tick_key(script_key, tick).as_str())?
      {
        Some(v) => Some(bincode::deserialize::<Balance>(v.value())?),
        None => None,
      },
    )
  }

  fn get_token_info(&self, tick: &Tick) -> Result<Option<TokenInfo>, Self::Error> {
    Ok(
      match self.rtx.open_table(BRC20_TOKEN)?.get(tick.hex().as_str())? {
        Some(v) => Some(bincode::deserialize::<TokenInfo>(v.value())?),
        None => None,
      },
    )
  }

  fn get_tokens_info(&self) -> Result<Vec<TokenInfo>, Self::Error> {
    let mut infos = Vec::new();
    for result in self.rtx.open_table(BRC20_TOKEN)?.iter()? {
      let (_, value) = result?;
      infos.push(bincode::deserialize::<TokenInfo>(value.value())?);
    }
    Ok(infos)
  }

  fn get_transferable(&self, script: &ScriptKey) -> Result<Vec<TransferableLog>, Self::Error> {
    let mut logs = Vec::new();
    for result in self.rtx.open_table(BRC20_TRANSFERABLELOG)?.iter()? {
      let (_, value) = result?;
      let log = bincode::deserialize::<TransferableLog>(value.value())?;
      if &log.owner == script {
        logs.push(log);
      }
    }
    Ok(logs)
  }

  fn get_transferable_by_id(
    &self,
    inscription_id: &InscriptionId,
  ) -> Result<Option<TransferableLog>, Self::Error> {
    Ok(
      match self
        .rtx
        .open_table(BRC20_TRANSFERABLELOG)?
        .get(inscription_id.to_string().as_str())?
      {
        Some(v) => Some(bincode::deserialize::<TransferableLog>(v.value())?),
        None => None,
      },
    )
  }
}
