use super::params::MAX_DECIMAL_WIDTH;
use crate::datastore::brc20::Tick;
use serde::{Deserialize, Serialize};

/// Indexing rules that real deployments disagree on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Policy {
  /// Clip a mint that overshoots the remaining supply instead of rejecting it.
  pub allow_mint_clipping: bool,
  pub case_sensitive_ticker: bool,
  pub max_decimals: u8,
}

impl Default for Policy {
  fn default() -> Self {
    Self {
      allow_mint_clipping: false,
      case_sensitive_ticker: false,
      max_decimals: MAX_DECIMAL_WIDTH,
    }
  }
}

impl Policy {
  /// The key a ticker is stored and looked up under.
  pub fn tick_key(&self, tick: &Tick) -> Tick {
    if self.case_sensitive_ticker {
      tick.clone()
    } else {
      tick.to_lowercase()
    }
  }

  pub fn max_decimals(&self) -> u8 {
    self.max_decimals.min(MAX_DECIMAL_WIDTH)
  }
}
