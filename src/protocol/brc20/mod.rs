use crate::{datastore::ScriptKey, InscriptionId, Sequence};

mod error;
mod msg_executor;
mod msg_resolver;
mod num;
mod operation;
mod params;
mod policy;

pub use self::{
  error::{Error, JSONError, NumError},
  msg_executor::execute,
  msg_resolver::resolve_message,
  num::Num,
  operation::{
    deserialize_brc20, Deploy as BRC20Deploy, Mint as BRC20Mint, Operation, RawOperation,
    Transfer as BRC20Transfer,
  },
  policy::Policy,
};

/// A record the resolver recognized as BRC-20, ready for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
  pub sequence: Sequence,
  pub inscription_id: InscriptionId,
  pub from: Option<ScriptKey>,
  pub to: Option<ScriptKey>,
  pub op: Operation,
}
