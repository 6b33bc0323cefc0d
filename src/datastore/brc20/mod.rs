pub(super) mod balance;
pub(super) mod errors;
pub(super) mod events;
pub mod redb;
pub(super) mod state;
pub(super) mod tick;
pub(super) mod token_info;
pub(super) mod transferable_log;

pub use self::{
  balance::Balance,
  errors::BRC20Error,
  events::*,
  state::{AppliedKey, LedgerState},
  tick::Tick,
  token_info::TokenInfo,
  transferable_log::TransferableLog,
};
use super::ScriptKey;
use crate::InscriptionId;
use std::fmt::{Debug, Display};

/// Read side of the token ledger. Ticks passed in are already normalized by
/// the active policy.
pub trait Brc20Reader {
  type Error: Debug + Display;

  fn get_balances(&self, script_key: &ScriptKey) -> Result<Vec<Balance>, Self::Error>;
  fn get_balance(
    &self,
    script_key: &ScriptKey,
    tick: &Tick,
  ) -> Result<Option<Balance>, Self::Error>;

  fn get_token_info(&self, tick: &Tick) -> Result<Option<TokenInfo>, Self::Error>;
  fn get_tokens_info(&self) -> Result<Vec<TokenInfo>, Self::Error>;

  fn get_transferable(&self, script: &ScriptKey) -> Result<Vec<TransferableLog>, Self::Error>;
  fn get_transferable_by_id(
    &self,
    inscription_id: &InscriptionId,
  ) -> Result<Option<TransferableLog>, Self::Error>;
}

pub trait Brc20ReaderWriter: Brc20Reader {
  fn update_token_balance(
    &mut self,
    script_key: &ScriptKey,
    tick: &Tick,
    new_balance: Balance,
  ) -> Result<(), Self::Error>;

  fn insert_token_info(&mut self, tick: &Tick, new_info: &TokenInfo) -> Result<(), Self::Error>;

  fn update_mint_token_info(
    &mut self,
    tick: &Tick,
    minted_amt: u128,
    minted_block_number: u64,
  ) -> Result<(), Self::Error>;

  fn insert_transferable(&mut self, inscription: TransferableLog) -> Result<(), Self::Error>;

  fn remove_transferable(&mut self, inscription_id: &InscriptionId) -> Result<(), Self::Error>;
}
