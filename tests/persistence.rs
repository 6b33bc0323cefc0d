use super::*;

fn stream() -> Vec<Vec<InscriptionRecord>> {
  vec![
    vec![
      inscribe(1, 0, "bc1qdeployer", DEPLOY),
      inscribe(1, 1, "bc1qholder", MINT),
    ],
    vec![inscribe(2, 2, "bc1qholder", TRANSFER)],
    vec![send(3, 0, 2, Some("bc1qrecipientaddress"))],
  ]
}

#[test]
fn restart_resumes_where_it_left_off() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("ledger").join("brc20.redb");
  let blocks = stream();

  {
    let store = Store::open(&path).unwrap();
    let mut indexer = Indexer::new(Policy::default(), 6);
    let receipts = indexer.apply_block(&blocks[0]).unwrap();
    store.commit(&indexer, &receipts, &[]).unwrap();
  }

  let store = Store::open(&path).unwrap();
  let snapshot = store.load(&Policy::default()).unwrap().unwrap();
  let mut resumed = Indexer::from_snapshot(Policy::default(), 6, snapshot);

  // Records from before the restart are recognised.
  for record in &blocks[0] {
    assert_eq!(resumed.apply(record), Ok(Outcome::AlreadyApplied));
  }
  for block in &blocks[1..] {
    let receipts = resumed.apply_block(block).unwrap();
    store.commit(&resumed, &receipts, &[]).unwrap();
  }

  let mut uninterrupted = Indexer::new(Policy::default(), 6);
  for block in &blocks {
    uninterrupted.apply_block(block).unwrap();
  }
  pretty_assert_eq!(resumed.state(), uninterrupted.state());

  let stored = store
    .with_reader(|reader| {
      Ok(reader.get_balance(&script("bc1qrecipientaddress"), &tick("mytk"))?)
    })
    .unwrap();
  pretty_assert_eq!(
    stored,
    Some(Balance {
      tick: tick("mytk"),
      available: 500 * ONE,
      transferable: 0,
    })
  );
}

#[test]
fn rollback_is_persisted() {
  let dir = tempfile::tempdir().unwrap();
  let store = Store::open(&dir.path().join("brc20.redb")).unwrap();
  let blocks = stream();

  let mut indexer = Indexer::new(Policy::default(), 6);
  for block in &blocks {
    let receipts = indexer.apply_block(block).unwrap();
    store.commit(&indexer, &receipts, &[]).unwrap();
  }

  let orphaned = indexer.unwind_to(2, &AtomicBool::new(false)).unwrap();
  store.commit(&indexer, &[], &orphaned).unwrap();

  let snapshot = store.load(&Policy::default()).unwrap().unwrap();
  pretty_assert_eq!(&snapshot.state, indexer.state());
  assert!(store
    .with_reader(|reader| reader.get_receipts(&inscription_id(2)))
    .unwrap()
    .is_empty());
  pretty_assert_eq!(
    balance(&snapshot.state, "bc1qholder", "mytk").available,
    1000 * ONE
  );
}

#[test]
fn failed_block_leaves_nothing_without_a_receipt() {
  let dir = tempfile::tempdir().unwrap();
  let store = Store::open(&dir.path().join("brc20.redb")).unwrap();

  let mut indexer = Indexer::new(Policy::default(), 6);
  let receipts = indexer
    .apply_block(&[inscribe(5, 0, "bc1qdeployer", DEPLOY)])
    .unwrap();
  store.commit(&indexer, &receipts, &[]).unwrap();

  let mint = inscribe(6, 1, "bc1qholder", MINT);
  pretty_assert_eq!(
    indexer.apply_block(&[mint.clone(), inscribe(4, 2, "bc1qholder", MINT)]),
    Err(Error::SequencingViolation {
      last: Sequence::new(6, 1),
      received: Sequence::new(4, 2),
    })
  );
  // What the indexing loop does on a fatal error.
  store.commit(&indexer, &[], &[]).unwrap();

  let snapshot = store.load(&Policy::default()).unwrap().unwrap();
  assert_eq!(snapshot.state.last_sequence(), Some(Sequence::new(5, 0)));

  let mut resumed = Indexer::from_snapshot(Policy::default(), 6, snapshot);
  let receipts = resumed.apply_block(&[mint]).unwrap();
  store.commit(&resumed, &receipts, &[]).unwrap();

  let stored = store
    .with_reader(|reader| reader.get_receipts(&inscription_id(1)))
    .unwrap();
  pretty_assert_eq!(stored, receipts);
  assert!(stored[0].result.is_ok());
}

#[test]
fn ledger_only_resumes_under_its_own_policy() {
  let dir = tempfile::tempdir().unwrap();
  let store = Store::open(&dir.path().join("brc20.redb")).unwrap();

  let mut indexer = Indexer::new(Policy::default(), 6);
  let receipts = indexer
    .apply_block(&[inscribe(1, 0, "bc1qdeployer", DEPLOY)])
    .unwrap();
  store.commit(&indexer, &receipts, &[]).unwrap();

  let error = store
    .load(&Policy {
      case_sensitive_ticker: true,
      ..Default::default()
    })
    .unwrap_err();
  assert!(error.to_string().contains("refusing to resume"));
  assert!(store.load(&Policy::default()).unwrap().is_some());
}
