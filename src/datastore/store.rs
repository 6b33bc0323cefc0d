use super::brc20::{
  redb::{DataStore, DataStoreReader},
  Receipt,
};
use crate::{
  index::{Indexer, Snapshot, UndoEntry},
  protocol::Policy,
  Result,
};
use anyhow::{bail, Context};
use redb::Database;
use std::path::{Path, PathBuf};

/// The on-disk ledger. One redb file holds the snapshot, the undo journal and
/// every receipt.
pub struct Store {
  database: Database,
  path: PathBuf,
}

impl Store {
  pub fn open(path: &Path) -> Result<Self> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("failed to create data dir `{}`", parent.display()))?;
    }

    let database = Database::create(path)
      .with_context(|| format!("failed to open database at `{}`", path.display()))?;

    let wtx = database.begin_write()?;
    DataStore::new(&wtx).init_tables()?;
    wtx.commit()?;

    log::info!("Opened ledger database {}", path.display());

    Ok(Self {
      database,
      path: path.to_path_buf(),
    })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Loads the stored ledger for an indexer running under `policy`. Ticker
  /// keys and decimals depend on the policy, so a ledger is only resumed
  /// under the one it was built with.
  pub fn load(&self, policy: &Policy) -> Result<Option<Snapshot>> {
    let rtx = self.database.begin_read()?;
    let reader = DataStoreReader::new(&rtx);

    if let Some(stored) = reader.policy()? {
      if stored != *policy {
        bail!(
          "ledger `{}` was built with {stored:?}, refusing to resume it with {policy:?}",
          self.path.display()
        );
      }
    }

    reader.load_snapshot()
  }

  /// Persists the indexer's state together with the receipts produced since
  /// the last commit, dropping receipts of `orphaned` entries. Everything goes
  /// through a single write transaction.
  pub fn commit(&self, indexer: &Indexer, receipts: &[Receipt], orphaned: &[UndoEntry]) -> Result {
    let wtx = self.database.begin_write()?;
    {
      let store = DataStore::new(&wtx);
      store.remove_receipts(orphaned)?;
      store.add_receipts(receipts)?;
      store.save_snapshot(
        indexer.policy(),
        indexer.state(),
        indexer.journal(),
        indexer.pruned_height(),
      )?;
    }
    wtx.commit()?;

    log::info!(
      "Committed ledger at {} ({} receipts, {} unwound)",
      indexer
        .state()
        .last_sequence()
        .map(|sequence| sequence.to_string())
        .unwrap_or_else(|| "genesis".into()),
      receipts.len(),
      orphaned.len(),
    );

    Ok(())
  }

  pub fn with_reader<T>(&self, f: impl FnOnce(&DataStoreReader) -> Result<T>) -> Result<T> {
    let rtx = self.database.begin_read()?;
    f(&DataStoreReader::new(&rtx))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    datastore::{
      brc20::{Brc20Reader, Tick},
      ScriptKey,
    },
    protocol::{InscriptionRecord, Policy},
    InscriptionId, Sequence,
  };
  use std::str::FromStr;

  fn id(n: u32) -> InscriptionId {
    InscriptionId::from_str(&format!("{}i{n}", "1".repeat(64))).unwrap()
  }

  fn alice() -> ScriptKey {
    ScriptKey::from_address("bc1qalice")
  }

  #[test]
  fn snapshot_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("brc20.redb");

    let mut indexer = Indexer::new(Policy::default(), 6);
    let receipts = indexer
      .apply_block(&[
        InscriptionRecord::inscribe(
          Sequence::new(1, 0),
          id(0),
          alice(),
          r#"{"p":"brc-20","op":"deploy","tick":"MYTK","max":"21000000","lim":"1000"}"#,
        ),
        InscriptionRecord::inscribe(
          Sequence::new(1, 1),
          id(1),
          alice(),
          r#"{"p":"brc-20","op":"mint","tick":"MYTK","amt":"1000"}"#,
        ),
      ])
      .unwrap();

    {
      let store = Store::open(&path).unwrap();
      assert!(store.load(&Policy::default()).unwrap().is_none());
      store.commit(&indexer, &receipts, &[]).unwrap();
    }

    let store = Store::open(&path).unwrap();
    let snapshot = store.load(&Policy::default()).unwrap().unwrap();
    assert_eq!(&snapshot.state, indexer.state());
    assert_eq!(snapshot.journal, indexer.journal().to_vec());

    let tick = Tick::from_str("mytk").unwrap();
    let balance = store
      .with_reader(|reader| Ok(reader.get_balance(&alice(), &tick)?))
      .unwrap()
      .unwrap();
    assert_eq!(balance.available, 1000 * 10u128.pow(18));

    let stored = store
      .with_reader(|reader| reader.get_receipts(&id(1)))
      .unwrap();
    assert_eq!(stored, vec![receipts[1].clone()]);
  }

  #[test]
  fn resuming_under_another_policy_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(&dir.path().join("brc20.redb")).unwrap();

    let mut indexer = Indexer::new(Policy::default(), 6);
    let receipts = indexer
      .apply_block(&[InscriptionRecord::inscribe(
        Sequence::new(1, 0),
        id(0),
        alice(),
        r#"{"p":"brc-20","op":"deploy","tick":"mytk","max":"21000000"}"#,
      )])
      .unwrap();
    store.commit(&indexer, &receipts, &[]).unwrap();

    let case_sensitive = Policy {
      case_sensitive_ticker: true,
      ..Default::default()
    };
    assert!(store.load(&case_sensitive).is_err());
    assert!(store
      .load(&Policy {
        max_decimals: 8,
        ..Default::default()
      })
      .is_err());
    assert_eq!(
      store.with_reader(|reader| reader.policy()).unwrap(),
      Some(Policy::default())
    );
    assert!(store.load(&Policy::default()).unwrap().is_some());
  }

  #[test]
  fn commit_drops_orphaned_receipts() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(&dir.path().join("brc20.redb")).unwrap();

    let mut indexer = Indexer::new(Policy::default(), 6);
    let receipts = indexer
      .apply_block(&[InscriptionRecord::inscribe(
        Sequence::new(5, 0),
        id(0),
        alice(),
        r#"{"p":"brc-20","op":"deploy","tick":"ordi","max":"21000000"}"#,
      )])
      .unwrap();
    store.commit(&indexer, &receipts, &[]).unwrap();

    let unwound = indexer
      .unwind_to(5, &std::sync::atomic::AtomicBool::new(false))
      .unwrap();
    store.commit(&indexer, &[], &unwound).unwrap();

    assert!(store
      .with_reader(|reader| reader.get_receipts(&id(0)))
      .unwrap()
      .is_empty());
    assert!(store
      .with_reader(|reader| Ok(reader.get_tokens_info()?))
      .unwrap()
      .is_empty());
  }
}
