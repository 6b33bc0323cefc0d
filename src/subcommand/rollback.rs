use {
  super::*,
  crate::{Sequence, SHUTTING_DOWN},
};

#[derive(Debug, Parser)]
pub(crate) struct Rollback {
  #[arg(long, help = "Unwind every record at <HEIGHT> or above.")]
  height: u64,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub unwound: u64,
  pub last_sequence: Option<Sequence>,
}

impl Rollback {
  pub(crate) fn run(self, options: &Options, config: &Config) -> SubcommandResult {
    let store = options.open_store(config)?;
    let snapshot = store
      .load(&options.policy(config))?
      .ok_or_else(|| anyhow!("nothing has been indexed in {}", store.path().display()))?;

    let mut indexer = options.indexer(config, Some(snapshot));
    let unwound = indexer
      .unwind_to(self.height, &SHUTTING_DOWN)
      .with_context(|| format!("failed to unwind to height {}", self.height))?;

    store.commit(&indexer, &[], &unwound)?;

    Ok(Box::new(Output {
      unwound: u64::try_from(unwound.len())?,
      last_sequence: indexer.state().last_sequence(),
    }))
  }
}
