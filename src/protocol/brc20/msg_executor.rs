use super::{
  params::{BIGDECIMAL_TEN, MAXIMUM_SUPPLY},
  BRC20Deploy, BRC20Mint, BRC20Transfer, Error, Message, Num, Operation, Policy,
};
use crate::datastore::{
  brc20::{
    BRC20Error, Balance, Brc20ReaderWriter, DeployEvent, Event, InscribeTransferEvent, MintEvent,
    Receipt, Tick, TokenInfo, TransferEvent, TransferableLog,
  },
  ScriptKey,
};
use bigdecimal::num_bigint::Sign;
use std::str::FromStr;

/// Applies one message to the ledger.
///
/// Rejections come back inside the receipt. An `Err` means the ledger itself
/// failed and the caller has to discard whatever this call wrote.
pub fn execute<L: Brc20ReaderWriter>(
  ledger: &mut L,
  policy: &Policy,
  msg: &Message,
) -> Result<Receipt, Error<L>> {
  log::debug!("BRC20 execute message: {:?}", msg);

  let (from, to) = match &msg.op {
    Operation::Transfer => {
      let owner = ledger
        .get_transferable_by_id(&msg.inscription_id)
        .map_err(Error::LedgerError)?
        .map(|log| log.owner);
      // redirect receiver to sender if transfer to coinbase.
      let to = msg.to.clone().or_else(|| owner.clone());
      (owner, to)
    }
    _ => (msg.from.clone(), msg.to.clone()),
  };

  let event = match &msg.op {
    Operation::Deploy(deploy) => process_deploy(ledger, policy, msg, deploy),
    Operation::Mint(mint) => process_mint(ledger, policy, msg, mint),
    Operation::InscribeTransfer(transfer) => {
      process_inscribe_transfer(ledger, policy, msg, transfer)
    }
    Operation::Transfer => process_transfer(ledger, msg),
  };

  let receipt = Receipt {
    inscription_id: msg.inscription_id,
    sequence: msg.sequence,
    op: Some(msg.op.op_type()),
    from,
    to,
    result: match event {
      Ok(event) => Ok(event),
      Err(Error::BRC20Error(e)) => Err(e),
      Err(e) => return Err(e),
    },
  };

  log::debug!("BRC20 message receipt: {:?}", receipt);

  Ok(receipt)
}

fn parse_tick(policy: &Policy, tick: &str) -> Result<(Tick, Tick), BRC20Error> {
  let tick = Tick::from_str(tick)?;
  Ok((policy.tick_key(&tick), tick))
}

fn parse_num(s: &str) -> Result<Num, BRC20Error> {
  Ok(Num::from_str(s)?)
}

fn process_deploy<L: Brc20ReaderWriter>(
  ledger: &mut L,
  policy: &Policy,
  msg: &Message,
  deploy: &BRC20Deploy,
) -> Result<Event, Error<L>> {
  // ignore inscribe inscription to coinbase.
  let to_script_key = msg.to.clone().ok_or(BRC20Error::InscribeToCoinbase)?;

  let (key, tick) = parse_tick(policy, &deploy.tick)?;

  if let Some(stored_tick_info) = ledger.get_token_info(&key).map_err(Error::LedgerError)? {
    return Err(Error::BRC20Error(BRC20Error::DuplicateDeploy(
      stored_tick_info.tick.to_string(),
    )));
  }

  let dec = match &deploy.decimals {
    Some(dec) => parse_num(dec)?
      .checked_to_u8()
      .map_err(|_| BRC20Error::MalformedInput(format!("invalid decimals {dec}")))?,
    None => policy.max_decimals(),
  };
  if dec > policy.max_decimals() {
    return Err(Error::BRC20Error(BRC20Error::DecimalsTooLarge(dec)));
  }
  let base = BIGDECIMAL_TEN.checked_powu(u64::from(dec))?;

  let supply = parse_num(&deploy.max_supply)?;

  if supply.sign() == Sign::NoSign || supply > *MAXIMUM_SUPPLY || supply.scale() > i64::from(dec) {
    return Err(Error::BRC20Error(BRC20Error::InvalidSupply(
      supply.to_string(),
    )));
  }

  let limit = match &deploy.mint_limit {
    Some(lim) => parse_num(lim)?,
    None => supply.clone(),
  };

  if limit.sign() == Sign::NoSign || limit > supply || limit.scale() > i64::from(dec) {
    return Err(Error::BRC20Error(BRC20Error::MintLimitOutOfRange(
      key.to_string(),
      limit.to_string(),
    )));
  }

  let supply = supply.checked_mul(&base)?.checked_to_u128()?;
  let limit = limit.checked_mul(&base)?.checked_to_u128()?;

  let new_info = TokenInfo {
    tick,
    inscription_id: msg.inscription_id,
    supply,
    minted: 0,
    limit_per_mint: limit,
    decimal: dec,
    deploy_by: to_script_key,
    deployed_sequence: msg.sequence,
    latest_mint_number: msg.sequence.height,
  };
  ledger
    .insert_token_info(&key, &new_info)
    .map_err(Error::LedgerError)?;

  Ok(Event::Deploy(DeployEvent {
    supply,
    limit_per_mint: limit,
    decimal: dec,
    tick: new_info.tick,
  }))
}

fn process_mint<L: Brc20ReaderWriter>(
  ledger: &mut L,
  policy: &Policy,
  msg: &Message,
  mint: &BRC20Mint,
) -> Result<Event, Error<L>> {
  // ignore inscribe inscription to coinbase.
  let to_script_key = msg.to.clone().ok_or(BRC20Error::InscribeToCoinbase)?;

  let (key, _) = parse_tick(policy, &mint.tick)?;

  let token_info = ledger
    .get_token_info(&key)
    .map_err(Error::LedgerError)?
    .ok_or_else(|| BRC20Error::TickNotFound(mint.tick.clone()))?;

  let base = BIGDECIMAL_TEN.checked_powu(u64::from(token_info.decimal))?;

  let mut amt = parse_num(&mint.amount)?;

  if amt.scale() > i64::from(token_info.decimal) {
    return Err(Error::BRC20Error(BRC20Error::AmountOverflow(
      amt.to_string(),
    )));
  }

  amt = amt.checked_mul(&base)?;
  if amt.sign() == Sign::NoSign {
    return Err(Error::BRC20Error(BRC20Error::InvalidZeroAmount));
  }
  if amt > Num::from(token_info.limit_per_mint) {
    return Err(Error::BRC20Error(BRC20Error::AmountExceedLimit(
      amt.to_string(),
    )));
  }

  let minted = Num::from(token_info.minted);
  let supply = Num::from(token_info.supply);

  if minted >= supply {
    return Err(Error::BRC20Error(BRC20Error::SupplyExceeded {
      tick: token_info.tick.to_string(),
      remaining: 0,
      amount: amt.checked_to_u128()?,
    }));
  }

  let mut out_msg = None;
  if amt.checked_add(&minted)? > supply {
    let remaining = supply.checked_sub(&minted)?;
    if !policy.allow_mint_clipping {
      return Err(Error::BRC20Error(BRC20Error::SupplyExceeded {
        tick: token_info.tick.to_string(),
        remaining: remaining.checked_to_u128()?,
        amount: amt.checked_to_u128()?,
      }));
    }
    // cut off any excess.
    out_msg = Some(format!(
      "amt has been cut off to fit the supply! origin: {}, now: {}",
      amt, remaining
    ));
    amt = remaining;
  }

  // get or initialize user balance.
  let mut balance = ledger
    .get_balance(&to_script_key, &key)
    .map_err(Error::LedgerError)?
    .unwrap_or_else(|| Balance::new(&key));

  balance.available = Num::from(balance.available)
    .checked_add(&amt)?
    .checked_to_u128()?;

  ledger
    .update_token_balance(&to_script_key, &key, balance)
    .map_err(Error::LedgerError)?;

  let minted = minted.checked_add(&amt)?.checked_to_u128()?;
  ledger
    .update_mint_token_info(&key, minted, msg.sequence.height)
    .map_err(Error::LedgerError)?;

  Ok(Event::Mint(MintEvent {
    tick: token_info.tick,
    amount: amt.checked_to_u128()?,
    msg: out_msg,
  }))
}

fn process_inscribe_transfer<L: Brc20ReaderWriter>(
  ledger: &mut L,
  policy: &Policy,
  msg: &Message,
  transfer: &BRC20Transfer,
) -> Result<Event, Error<L>> {
  // ignore inscribe inscription to coinbase.
  let to_script_key = msg.to.clone().ok_or(BRC20Error::InscribeToCoinbase)?;

  let (key, _) = parse_tick(policy, &transfer.tick)?;

  let token_info = ledger
    .get_token_info(&key)
    .map_err(Error::LedgerError)?
    .ok_or_else(|| BRC20Error::TickNotFound(transfer.tick.clone()))?;

  let base = BIGDECIMAL_TEN.checked_powu(u64::from(token_info.decimal))?;

  let mut amt = parse_num(&transfer.amount)?;

  if amt.scale() > i64::from(token_info.decimal) {
    return Err(Error::BRC20Error(BRC20Error::AmountOverflow(
      amt.to_string(),
    )));
  }

  amt = amt.checked_mul(&base)?;
  if amt.sign() == Sign::NoSign {
    return Err(Error::BRC20Error(BRC20Error::InvalidZeroAmount));
  }
  if amt > Num::from(token_info.supply) {
    return Err(Error::BRC20Error(BRC20Error::AmountOverflow(
      amt.to_string(),
    )));
  }
  let amt = amt.checked_to_u128()?;

  let mut balance = ledger
    .get_balance(&to_script_key, &key)
    .map_err(Error::LedgerError)?
    .unwrap_or_else(|| Balance::new(&key));

  if balance.available < amt {
    return Err(Error::BRC20Error(BRC20Error::InsufficientBalance(
      balance.available,
      amt,
    )));
  }

  balance.available -= amt;
  balance.transferable = Num::from(balance.transferable)
    .checked_add(&Num::from(amt))?
    .checked_to_u128()?;

  ledger
    .update_token_balance(&to_script_key, &key, balance)
    .map_err(Error::LedgerError)?;

  ledger
    .insert_transferable(TransferableLog {
      inscription_id: msg.inscription_id,
      sequence: msg.sequence,
      amount: amt,
      tick: key,
      owner: to_script_key,
      recipient_hint: transfer.to.clone().map(ScriptKey::from_address),
    })
    .map_err(Error::LedgerError)?;

  Ok(Event::InscribeTransfer(InscribeTransferEvent {
    tick: token_info.tick,
    amount: amt,
  }))
}

fn process_transfer<L: Brc20ReaderWriter>(
  ledger: &mut L,
  msg: &Message,
) -> Result<Event, Error<L>> {
  let transferable = ledger
    .get_transferable_by_id(&msg.inscription_id)
    .map_err(Error::LedgerError)?
    .ok_or(BRC20Error::UnknownIntent(msg.inscription_id))?;

  let amt = transferable.amount;
  let owner = transferable.owner;
  let tick = transferable.tick;

  let token_info = ledger
    .get_token_info(&tick)
    .map_err(Error::LedgerError)?
    .ok_or_else(|| BRC20Error::TickNotFound(tick.to_string()))?;

  let mut from_balance = ledger
    .get_balance(&owner, &tick)
    .map_err(Error::LedgerError)?
    .unwrap_or_else(|| Balance::new(&tick));

  if from_balance.transferable < amt {
    log::warn!(
      "Transfer inscription {} invalidated: owner {} holds {} transferable, needs {}",
      msg.inscription_id,
      owner,
      from_balance.transferable,
      amt
    );
    ledger
      .remove_transferable(&msg.inscription_id)
      .map_err(Error::LedgerError)?;
    return Err(Error::BRC20Error(BRC20Error::IntentInvalidated(
      msg.inscription_id,
    )));
  }

  from_balance.transferable -= amt;
  ledger
    .update_token_balance(&owner, &tick, from_balance)
    .map_err(Error::LedgerError)?;

  // redirect receiver to sender if transfer to coinbase.
  let mut out_msg = None;
  let to_script_key = match msg.to.clone() {
    Some(to) => to,
    None => {
      out_msg = Some(
        "redirect receiver to sender, reason: transfer inscription to coinbase".to_string(),
      );
      owner.clone()
    }
  };

  let mut to_balance = ledger
    .get_balance(&to_script_key, &tick)
    .map_err(Error::LedgerError)?
    .unwrap_or_else(|| Balance::new(&tick));

  to_balance.available = Num::from(to_balance.available)
    .checked_add(&Num::from(amt))?
    .checked_to_u128()?;

  ledger
    .update_token_balance(&to_script_key, &tick, to_balance)
    .map_err(Error::LedgerError)?;

  ledger
    .remove_transferable(&msg.inscription_id)
    .map_err(Error::LedgerError)?;

  Ok(Event::Transfer(TransferEvent {
    tick: token_info.tick,
    amount: amt,
    msg: out_msg,
  }))
}
