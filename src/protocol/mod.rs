pub mod brc20;
mod record;

pub use self::{
  brc20::Policy,
  record::{Action, ActionKind, InscriptionRecord},
};
