use {
  super::*,
  crate::{
    datastore::Store,
    index::{Indexer, Snapshot},
    protocol::Policy,
  },
  log::LevelFilter,
};

const DEFAULT_MAX_REORG_DEPTH: u64 = 6;

#[derive(Clone, Debug, Parser)]
pub(crate) struct Options {
  #[arg(long, help = "Load configuration from <CONFIG>.")]
  pub(crate) config: Option<PathBuf>,
  #[arg(long, help = "Store the ledger in <DATA_DIR>.")]
  pub(crate) data_dir: Option<PathBuf>,
  #[arg(long, default_value = "info", help = "Log at <LOG_LEVEL> and above.")]
  pub(crate) log_level: LevelFilter,
  #[arg(long, help = "Also write logs to files in <LOG_DIR>.")]
  pub(crate) log_dir: Option<PathBuf>,
  #[arg(long, help = "Clip mints that overshoot the remaining supply.")]
  pub(crate) allow_mint_clipping: bool,
  #[arg(long, help = "Treat tickers that differ only in case as distinct.")]
  pub(crate) case_sensitive_ticker: bool,
  #[arg(long, help = "Reject deploys with more than <MAX_DECIMALS> decimals.")]
  pub(crate) max_decimals: Option<u8>,
  #[arg(long, help = "Keep undo history for the last <MAX_REORG_DEPTH> blocks.")]
  pub(crate) max_reorg_depth: Option<u64>,
}

impl Options {
  pub(crate) fn load_config(&self) -> Result<Config> {
    match &self.config {
      Some(path) => Config::load(path),
      None => Ok(Config::default()),
    }
  }

  pub(crate) fn policy(&self, config: &Config) -> Policy {
    let mut policy = config.policy;
    if self.allow_mint_clipping {
      policy.allow_mint_clipping = true;
    }
    if self.case_sensitive_ticker {
      policy.case_sensitive_ticker = true;
    }
    if let Some(max_decimals) = self.max_decimals {
      policy.max_decimals = max_decimals;
    }
    policy
  }

  pub(crate) fn max_reorg_depth(&self, config: &Config) -> u64 {
    self
      .max_reorg_depth
      .or(config.max_reorg_depth)
      .unwrap_or(DEFAULT_MAX_REORG_DEPTH)
  }

  pub(crate) fn data_dir(&self, config: &Config) -> Result<PathBuf> {
    if let Some(data_dir) = self.data_dir.as_ref().or(config.data_dir.as_ref()) {
      return Ok(data_dir.clone());
    }

    Ok(
      dirs::data_dir()
        .ok_or_else(|| anyhow!("failed to retrieve data dir"))?
        .join("brc20-indexer"),
    )
  }

  pub(crate) fn log_dir(&self, config: &Config) -> Option<PathBuf> {
    self.log_dir.clone().or_else(|| config.log_dir.clone())
  }

  pub(crate) fn open_store(&self, config: &Config) -> Result<Store> {
    Store::open(&self.data_dir(config)?.join("brc20.redb"))
  }

  pub(crate) fn indexer(&self, config: &Config, snapshot: Option<Snapshot>) -> Indexer {
    let policy = self.policy(config);
    let max_reorg_depth = self.max_reorg_depth(config);
    match snapshot {
      Some(snapshot) => Indexer::from_snapshot(policy, max_reorg_depth, snapshot),
      None => Indexer::new(policy, max_reorg_depth),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(args: &str) -> Options {
    Options::try_parse_from(args.split_whitespace()).unwrap()
  }

  #[test]
  fn defaults() {
    let options = parse("brc20-indexer");
    let config = Config::default();
    assert_eq!(options.log_level, LevelFilter::Info);
    assert_eq!(options.policy(&config), Policy::default());
    assert_eq!(options.max_reorg_depth(&config), DEFAULT_MAX_REORG_DEPTH);
    assert_eq!(options.log_dir(&config), None);
  }

  #[test]
  fn flags_override_config() {
    let options = parse(
      "brc20-indexer --allow-mint-clipping --max-decimals 8 --max-reorg-depth 3 --data-dir /tmp/a",
    );
    let config = Config {
      policy: Policy {
        case_sensitive_ticker: true,
        max_decimals: 2,
        ..Default::default()
      },
      max_reorg_depth: Some(100),
      data_dir: Some("/tmp/b".into()),
      log_dir: Some("/tmp/logs".into()),
    };

    assert_eq!(
      options.policy(&config),
      Policy {
        allow_mint_clipping: true,
        case_sensitive_ticker: true,
        max_decimals: 8,
      }
    );
    assert_eq!(options.max_reorg_depth(&config), 3);
    assert_eq!(options.data_dir(&config).unwrap(), PathBuf::from("/tmp/a"));
    assert_eq!(options.log_dir(&config), Some(PathBuf::from("/tmp/logs")));
  }

  #[test]
  fn log_level_parses() {
    assert_eq!(
      parse("brc20-indexer --log-level debug").log_level,
      LevelFilter::Debug
    );
    assert!(Options::try_parse_from(["brc20-indexer", "--log-level", "loud"]).is_err());
  }
}
