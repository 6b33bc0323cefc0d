mod deploy;
mod mint;
mod transfer;

use super::{error::JSONError, params::PROTOCOL_LITERAL};
use crate::datastore::brc20::OperationType;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub use self::{deploy::Deploy, mint::Mint, transfer::Transfer};

/// What the ledger is asked to do with one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
  Deploy(Deploy),
  Mint(Mint),
  InscribeTransfer(Transfer),
  Transfer,
}

impl Operation {
  pub fn op_type(&self) -> OperationType {
    match self {
      Operation::Deploy(_) => OperationType::Deploy,
      Operation::Mint(_) => OperationType::Mint,
      Operation::InscribeTransfer(_) => OperationType::InscribeTransfer,
      Operation::Transfer => OperationType::Transfer,
    }
  }
}

/// A payload exactly as inscribed.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "op")]
pub enum RawOperation {
  #[serde(rename = "deploy")]
  Deploy(Deploy),
  #[serde(rename = "mint")]
  Mint(Mint),
  #[serde(rename = "transfer")]
  Transfer(Transfer),
}

impl From<RawOperation> for Operation {
  fn from(raw: RawOperation) -> Self {
    match raw {
      RawOperation::Deploy(deploy) => Operation::Deploy(deploy),
      RawOperation::Mint(mint) => Operation::Mint(mint),
      RawOperation::Transfer(transfer) => Operation::InscribeTransfer(transfer),
    }
  }
}

pub fn deserialize_brc20(s: &str) -> Result<RawOperation, JSONError> {
  let value: Value = serde_json::from_str(s).map_err(|_| JSONError::InvalidJson)?;
  if value.get("p") != Some(&json!(PROTOCOL_LITERAL)) {
    return Err(JSONError::NotBRC20Json);
  }

  serde_json::from_value(value).map_err(|e| JSONError::ParseOperationJsonError(e.to_string()))
}
