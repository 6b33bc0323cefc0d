use super::*;

mod balance;
mod index;
mod rollback;
mod tokens;

#[derive(Debug, Parser)]
pub(crate) enum Subcommand {
  #[command(about = "Apply JSON-lines inscription records to the ledger")]
  Index(index::Index),
  #[command(about = "Show the token balances of an address")]
  Balance(balance::Balance),
  #[command(about = "List deployed tokens")]
  Tokens,
  #[command(about = "Unwind the ledger to before a block height")]
  Rollback(rollback::Rollback),
}

impl Subcommand {
  pub(crate) fn run(self, options: &Options, config: &Config) -> SubcommandResult {
    match self {
      Self::Index(index) => index.run(options, config),
      Self::Balance(balance) => balance.run(options, config),
      Self::Tokens => tokens::run(options, config),
      Self::Rollback(rollback) => rollback.run(options, config),
    }
  }
}

pub trait Output: Send {
  fn print_json(&self);
}

impl<T> Output for T
where
  T: Serialize + Send,
{
  fn print_json(&self) {
    serde_json::to_writer_pretty(io::stdout(), self).ok();
    println!();
  }
}

pub(crate) type SubcommandResult = Result<Box<dyn Output>>;

/// Renders a scaled integer amount with its decimal point restored.
pub(crate) fn format_amount(amount: u128, decimal: u8) -> String {
  let base = 10u128.pow(u32::from(decimal));
  let (integer, fraction) = (amount / base, amount % base);
  if fraction == 0 {
    return integer.to_string();
  }

  let fraction = format!("{:0width$}", fraction, width = usize::from(decimal));
  format!("{integer}.{}", fraction.trim_end_matches('0'))
}
