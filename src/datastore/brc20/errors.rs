use crate::InscriptionId;
use serde::{Deserialize, Serialize};

/// Rejection reasons recorded in receipts. None of them halt ingestion.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Deserialize, Serialize)]
pub enum BRC20Error {
  #[error("malformed input: {0}")]
  MalformedInput(String),

  #[error("illegal tick length '{0}'")]
  InvalidTickLen(String),

  #[error("illegal tick char '{0}'")]
  InvalidTickChar(String),

  #[error("tick: {0} has been existed")]
  DuplicateDeploy(String),

  #[error("tick: {0} not found")]
  TickNotFound(String),

  #[error("decimals {0} too large")]
  DecimalsTooLarge(u8),

  #[error("tick invalid supply {0}")]
  InvalidSupply(String),

  #[error("tick: {0} mint limit out of range {1}")]
  MintLimitOutOfRange(String, String),

  #[error("zero amount not allowed")]
  InvalidZeroAmount,

  #[error("amount overflow: {0}")]
  AmountOverflow(String),

  #[error("amount exceed limit: {0}")]
  AmountExceedLimit(String),

  #[error("tick: {tick} supply exceeded, remaining: {remaining}, requested: {amount}")]
  SupplyExceeded {
    tick: String,
    remaining: u128,
    amount: u128,
  },

  #[error("insufficient balance: {0} {1}")]
  InsufficientBalance(u128, u128),

  #[error("invalid inscribe to coinbase")]
  InscribeToCoinbase,

  #[error("no outstanding transfer for inscription {0}")]
  UnknownIntent(InscriptionId),

  #[error("transfer inscription {0} invalidated, owner no longer holds the transferable amount")]
  IntentInvalidated(InscriptionId),
}

impl BRC20Error {
  /// Late or duplicate settlements are expected traffic, not failures.
  pub fn is_benign(&self) -> bool {
    matches!(self, Self::UnknownIntent(_) | Self::IntentInvalidated(_))
  }
}
