use crate::{datastore::ScriptKey, InscriptionId, Sequence};
use serde::{Deserialize, Serialize};

/// A decoded inscription event handed over by the decoder, already placed in
/// canonical chain order.
#[derive(Debug, Clone, PartialEq)]
pub struct InscriptionRecord {
  pub sequence: Sequence,
  pub inscription_id: InscriptionId,
  pub action: Action,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
  /// The inscription was created. `owner` is `None` when it was inscribed
  /// straight into the fee.
  Inscribe {
    owner: Option<ScriptKey>,
    content: String,
  },
  /// The inscription itself moved. `to` is `None` when it was spent as fee.
  Send { to: Option<ScriptKey> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
  Inscribe,
  Send,
}

impl InscriptionRecord {
  pub fn inscribe(
    sequence: Sequence,
    inscription_id: InscriptionId,
    owner: ScriptKey,
    content: impl Into<String>,
  ) -> Self {
    Self {
      sequence,
      inscription_id,
      action: Action::Inscribe {
        owner: Some(owner),
        content: content.into(),
      },
    }
  }

  pub fn send(sequence: Sequence, inscription_id: InscriptionId, to: Option<ScriptKey>) -> Self {
    Self {
      sequence,
      inscription_id,
      action: Action::Send { to },
    }
  }

  pub fn kind(&self) -> ActionKind {
    match self.action {
      Action::Inscribe { .. } => ActionKind::Inscribe,
      Action::Send { .. } => ActionKind::Send,
    }
  }
}
