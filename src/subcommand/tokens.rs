use {
  super::*,
  crate::{datastore::brc20::Brc20Reader, InscriptionId, Sequence},
};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
  pub tick: String,
  pub inscription_id: InscriptionId,
  pub supply: String,
  pub minted: String,
  pub limit_per_mint: String,
  pub decimal: u8,
  pub deploy_by: String,
  pub deployed_at: Sequence,
}

pub(crate) fn run(options: &Options, config: &Config) -> SubcommandResult {
  let store = options.open_store(config)?;

  let tokens = store
    .with_reader(|reader| Ok(reader.get_tokens_info()?))?
    .into_iter()
    .map(|info| Token {
      tick: info.tick.to_string(),
      inscription_id: info.inscription_id,
      supply: format_amount(info.supply, info.decimal),
      minted: format_amount(info.minted, info.decimal),
      limit_per_mint: format_amount(info.limit_per_mint, info.decimal),
      decimal: info.decimal,
      deploy_by: info.deploy_by.to_string(),
      deployed_at: info.deployed_sequence,
    })
    .collect::<Vec<Token>>();

  Ok(Box::new(tokens))
}
