mod read_only;
mod read_write;

use super::{ScriptKey, Tick};
use redb::TableDefinition;

pub use self::{read_only::DataStoreReader, read_write::DataStore};

pub(crate) const BRC20_BALANCES: TableDefinition<&str, &[u8]> =
  TableDefinition::new("BRC20_BALANCES");
pub(crate) const BRC20_TOKEN: TableDefinition<&str, &[u8]> = TableDefinition::new("BRC20_TOKEN");
pub(crate) const BRC20_EVENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("BRC20_EVENTS");
pub(crate) const BRC20_TRANSFERABLELOG: TableDefinition<&str, &[u8]> =
  TableDefinition::new("BRC20_TRANSFERABLELOG");
pub(crate) const BRC20_APPLIED: TableDefinition<&str, &[u8]> =
  TableDefinition::new("BRC20_APPLIED");
pub(crate) const BRC20_JOURNAL: TableDefinition<&str, &[u8]> =
  TableDefinition::new("BRC20_JOURNAL");
pub(crate) const BRC20_STATISTIC: TableDefinition<&str, &[u8]> =
  TableDefinition::new("BRC20_STATISTIC");

const LAST_SEQUENCE: &str = "last_sequence";
const PRUNED_HEIGHT: &str = "pruned_height";
const POLICY: &str = "policy";

// Tick hex never contains `_`, so the last one separates owner and tick.
fn script_tick_key(script: &ScriptKey, tick: &Tick) -> String {
  format!("{}_{}", script, tick.hex())
}

fn min_script_tick_key(script: &ScriptKey) -> String {
  format!("{}_", script)
}

fn max_script_tick_key(script: &ScriptKey) -> String {
  format!("{}_g", script)
}

fn parse_script_tick_key(key: &str) -> Option<(ScriptKey, Tick)> {
  let (script, tick) = key.rsplit_once('_')?;
  Some((ScriptKey::from_address(script), Tick::from_hex(tick)?))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::str::FromStr;

  #[test]
  fn script_tick_key_round_trip() {
    let script = ScriptKey::from_address("bc1qhvd6suvqzjcu9pxjhrwhtrlj85ny3n2mqql5w4");
    let tick = Tick::from_str("ordi").unwrap();
    let key = script_tick_key(&script, &tick);
    assert_eq!(parse_script_tick_key(&key), Some((script.clone(), tick)));
    assert!(min_script_tick_key(&script) < key);
    assert!(key < max_script_tick_key(&script));
  }
}
