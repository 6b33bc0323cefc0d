use super::*;

#[derive(Debug, Parser)]
#[command(version, about = "BRC-20 inscription ledger indexer")]
pub(crate) struct Arguments {
  #[command(flatten)]
  pub(crate) options: Options,
  #[command(subcommand)]
  pub(crate) subcommand: Subcommand,
}

impl Arguments {
  pub(crate) fn run(self) -> SubcommandResult {
    let config = self.options.load_config()?;
    logger::init(self.options.log_level, self.options.log_dir(&config).as_deref())?;
    self.subcommand.run(&self.options, &config)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn global_options_before_subcommand() {
    let arguments = Arguments::try_parse_from([
      "brc20-indexer",
      "--data-dir",
      "/tmp/brc20",
      "balance",
      "--address",
      "bc1qrecipientaddress",
    ])
    .unwrap();
    assert_eq!(arguments.options.data_dir, Some("/tmp/brc20".into()));
    assert!(matches!(arguments.subcommand, Subcommand::Balance(_)));
  }

  #[test]
  fn subcommand_is_required() {
    assert!(Arguments::try_parse_from(["brc20-indexer"]).is_err());
  }
}
