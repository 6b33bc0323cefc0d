use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Transfer {
  #[serde(rename = "tick")]
  pub tick: String,
  #[serde(rename = "amt")]
  pub amount: String,
  // Declared receiver. The inscription's actual destination wins.
  #[serde(rename = "to", default, skip_serializing_if = "Option::is_none")]
  pub to: Option<String>,
}
