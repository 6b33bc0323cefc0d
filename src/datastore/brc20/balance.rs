use super::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Balance {
  pub tick: Tick,
  pub available: u128,
  pub transferable: u128,
}

impl Balance {
  pub fn new(tick: &Tick) -> Self {
    Self {
      tick: tick.clone(),
      available: 0,
      transferable: 0,
    }
  }

  pub fn overall(&self) -> u128 {
    self.available.saturating_add(self.transferable)
  }
}
