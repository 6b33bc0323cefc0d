use super::{deserialize_brc20, Error, JSONError, Message, Operation};
use crate::{
  datastore::brc20::{BRC20Error, Brc20Reader},
  protocol::{Action, InscriptionRecord},
};

/// Turns a record into a message.
///
/// `Ok(None)` means the record is not BRC-20 at all and must leave the ledger
/// untouched. That includes moves of inscriptions that carry no outstanding
/// transfer. A record that claims to be BRC-20 but cannot be parsed yields
/// `MalformedInput`, which still ends up in a receipt.
pub fn resolve_message<R: Brc20Reader>(
  ledger: &R,
  record: &InscriptionRecord,
) -> Result<Option<Message>, Error<R>> {
  let (from, to, op) = match &record.action {
    Action::Inscribe { owner, content } => match deserialize_brc20(content) {
      Ok(raw) => (owner.clone(), owner.clone(), Operation::from(raw)),
      Err(JSONError::InvalidJson) | Err(JSONError::NotBRC20Json) => return Ok(None),
      Err(e @ JSONError::ParseOperationJsonError(_)) => {
        return Err(Error::BRC20Error(BRC20Error::MalformedInput(
          e.to_string(),
        )))
      }
    },
    Action::Send { to } => {
      // Only the first move of a transfer inscription settles anything.
      if ledger
        .get_transferable_by_id(&record.inscription_id)
        .map_err(Error::LedgerError)?
        .is_none()
      {
        log::debug!(
          "Ignoring send of {}: no outstanding transfer",
          record.inscription_id
        );
        return Ok(None);
      }
      // The owner is whoever holds the transfer intent, looked up at execution.
      (None, to.clone(), Operation::Transfer)
    }
  };

  Ok(Some(Message {
    sequence: record.sequence,
    inscription_id: record.inscription_id,
    from,
    to,
    op,
  }))
}
