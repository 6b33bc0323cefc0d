use {
  super::*,
  crate::datastore::{brc20::Brc20Reader, ScriptKey},
};

#[derive(Debug, Parser)]
pub(crate) struct Balance {
  #[arg(long, help = "Show balances held by <ADDRESS>.")]
  address: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenBalance {
  pub tick: String,
  pub available: String,
  pub transferable: String,
  pub overall: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub address: String,
  pub balances: Vec<TokenBalance>,
}

impl Balance {
  pub(crate) fn run(self, options: &Options, config: &Config) -> SubcommandResult {
    let store = options.open_store(config)?;
    let script = ScriptKey::from_address(self.address.clone());

    let balances = store.with_reader(|reader| {
      let mut balances = Vec::new();
      for balance in reader.get_balances(&script)? {
        let info = reader
          .get_token_info(&balance.tick)?
          .ok_or_else(|| anyhow!("balance of unknown tick {}", balance.tick))?;
        balances.push(TokenBalance {
          tick: info.tick.to_string(),
          available: format_amount(balance.available, info.decimal),
          transferable: format_amount(balance.transferable, info.decimal),
          overall: format_amount(balance.overall(), info.decimal),
        });
      }
      Ok(balances)
    })?;

    Ok(Box::new(Output {
      address: self.address,
      balances,
    }))
  }
}
