use crate::Sequence;

/// Conditions that stop ingestion. Rejected operations are not errors here;
/// they travel inside receipts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
  #[error("sequencing violation: received {received} after {last}")]
  SequencingViolation { last: Sequence, received: Sequence },

  #[error("cannot unwind to height {height}: journal pruned through height {pruned}")]
  ReorgTooDeep { height: u64, pruned: u64 },

  #[error("reorg unwind cancelled")]
  Cancelled,

  #[error("execution failed: {0}")]
  Execution(String),
}
