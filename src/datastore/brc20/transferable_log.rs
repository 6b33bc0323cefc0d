use super::*;
use crate::{InscriptionId, Sequence};
use serde::{Deserialize, Serialize};

/// An inscribed transfer waiting for its inscription to be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferableLog {
  pub inscription_id: InscriptionId,
  pub sequence: Sequence,
  pub amount: u128,
  pub tick: Tick,
  pub owner: ScriptKey,
  // `to` from the payload; the send event decides the real receiver.
  pub recipient_hint: Option<ScriptKey>,
}
