use super::*;

fn base() -> Vec<InscriptionRecord> {
  vec![
    inscribe(1, 0, "bc1qdeployer", DEPLOY),
    inscribe(1, 1, "bc1qholder", MINT),
  ]
}

fn blocks_abc() -> Vec<Vec<InscriptionRecord>> {
  vec![
    vec![inscribe(2, 2, "bc1qholder", TRANSFER)],
    vec![
      send(3, 0, 2, Some("bc1qrecipientaddress")),
      inscribe(3, 3, "bc1qother", MINT),
    ],
    vec![inscribe(
      4,
      4,
      "bc1qrecipientaddress",
      r#"{"p":"brc-20","op":"transfer","tick":"mytk","amt":"100"}"#,
    )],
  ]
}

#[test]
fn unwinding_a_branch_restores_the_ledger() {
  let mut indexer = Indexer::new(Policy::default(), 6);
  indexer.apply_block(&base()).unwrap();
  let before = indexer.state().clone();

  for block in blocks_abc() {
    indexer.apply_block(&block).unwrap();
    assert_invariants(indexer.state());
  }

  let unwound = indexer.unwind_to(2, &AtomicBool::new(false)).unwrap();
  assert_eq!(unwound.len(), 4);
  pretty_assert_eq!(indexer.state(), &before);
  pretty_assert_eq!(*indexer.handle().snapshot(), before);
}

#[test]
fn replacement_branch_matches_a_fresh_run() {
  let replacement = vec![
    vec![inscribe(2, 7, "bc1qother", MINT)],
    vec![inscribe(3, 8, "bc1qother", TRANSFER)],
    vec![send(4, 0, 8, None)],
  ];

  let mut reorged = Indexer::new(Policy::default(), 6);
  reorged.apply_block(&base()).unwrap();
  for block in blocks_abc() {
    reorged.apply_block(&block).unwrap();
  }
  reorged.unwind_to(2, &AtomicBool::new(false)).unwrap();
  for block in &replacement {
    reorged.apply_block(block).unwrap();
  }

  let mut fresh = Indexer::new(Policy::default(), 6);
  fresh.apply_block(&base()).unwrap();
  for block in &replacement {
    fresh.apply_block(block).unwrap();
  }

  pretty_assert_eq!(reorged.state(), fresh.state());
  pretty_assert_eq!(reorged.journal(), fresh.journal());
  assert_invariants(reorged.state());

  // Sent to the coinbase, so the amount went back to the sender.
  pretty_assert_eq!(
    balance(reorged.state(), "bc1qother", "mytk").available,
    1000 * ONE
  );
}

#[test]
fn cancelled_unwind_leaves_the_ledger_alone() {
  let mut indexer = Indexer::new(Policy::default(), 6);
  indexer.apply_block(&base()).unwrap();
  for block in blocks_abc() {
    indexer.apply_block(&block).unwrap();
  }
  let before = indexer.state().clone();

  pretty_assert_eq!(
    indexer.unwind_to(2, &AtomicBool::new(true)),
    Err(Error::Cancelled)
  );
  pretty_assert_eq!(indexer.state(), &before);
}

#[test]
fn unwinding_below_the_journal_horizon_fails() {
  let mut indexer = Indexer::new(Policy::default(), 2);
  indexer.apply_block(&base()).unwrap();
  for block in blocks_abc() {
    indexer.apply_block(&block).unwrap();
  }
  assert_eq!(indexer.pruned_height(), Some(2));

  pretty_assert_eq!(
    indexer.unwind_to(2, &AtomicBool::new(false)),
    Err(Error::ReorgTooDeep {
      height: 2,
      pruned: 2,
    })
  );
  indexer.unwind_to(3, &AtomicBool::new(false)).unwrap();
  assert_eq!(indexer.state().last_sequence(), Some(Sequence::new(2, 2)));
}
