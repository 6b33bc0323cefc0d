pub mod brc20;
mod script_key;
pub mod store;

pub use self::{script_key::ScriptKey, store::Store};
