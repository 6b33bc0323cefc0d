use {
  super::*,
  crate::{
    datastore::{brc20::Receipt, ScriptKey},
    protocol::InscriptionRecord,
    InscriptionId, Sequence, SHUTTING_DOWN,
  },
  std::{
    fs::File,
    io::{BufRead, BufReader},
  },
};

#[derive(Debug, Parser)]
pub(crate) struct Index {
  #[arg(long, help = "Read inscription records, one JSON object per line, from <INPUT>.")]
  input: PathBuf,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub blocks: u64,
  pub applied: u64,
  pub rejected: u64,
  pub skipped: u64,
  pub last_sequence: Option<Sequence>,
  pub interrupted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum LineAction {
  Inscribe,
  Send,
}

/// One line of the record stream as the decoder writes it.
#[derive(Debug, Deserialize)]
struct RecordLine {
  height: u64,
  index: u32,
  inscription_id: InscriptionId,
  action: LineAction,
  #[serde(default)]
  address: Option<String>,
  #[serde(default)]
  content: Option<serde_json::Value>,
  #[serde(default)]
  to: Option<String>,
}

impl TryFrom<RecordLine> for InscriptionRecord {
  type Error = Error;

  fn try_from(line: RecordLine) -> Result<Self> {
    let sequence = Sequence::new(line.height, line.index);
    Ok(match line.action {
      LineAction::Inscribe => {
        let content = match line.content {
          Some(serde_json::Value::String(content)) => content,
          Some(content) => content.to_string(),
          None => bail!("inscribe record {} has no content", line.inscription_id),
        };
        InscriptionRecord {
          sequence,
          inscription_id: line.inscription_id,
          action: crate::protocol::Action::Inscribe {
            owner: line.address.map(ScriptKey::from_address),
            content,
          },
        }
      }
      LineAction::Send => InscriptionRecord::send(
        sequence,
        line.inscription_id,
        line.to.map(ScriptKey::from_address),
      ),
    })
  }
}

fn read_records(path: &Path) -> Result<Vec<InscriptionRecord>> {
  let file =
    File::open(path).with_context(|| format!("failed to open input `{}`", path.display()))?;

  let mut records = Vec::new();
  for (i, line) in BufReader::new(file).lines().enumerate() {
    let line = line?;
    if line.trim().is_empty() {
      continue;
    }
    let record = serde_json::from_str::<RecordLine>(&line)
      .map_err(Error::from)
      .and_then(InscriptionRecord::try_from)
      .with_context(|| format!("invalid record on line {}", i + 1))?;
    records.push(record);
  }

  Ok(records)
}

// Consecutive records sharing a height form one block.
fn into_blocks(records: Vec<InscriptionRecord>) -> Vec<Vec<InscriptionRecord>> {
  let mut blocks: Vec<Vec<InscriptionRecord>> = Vec::new();
  for record in records {
    match blocks.last_mut() {
      Some(block)
        if block.last().map(|last| last.sequence.height) == Some(record.sequence.height) =>
      {
        block.push(record)
      }
      _ => blocks.push(vec![record]),
    }
  }
  blocks
}

impl Index {
  pub(crate) fn run(self, options: &Options, config: &Config) -> SubcommandResult {
    let store = options.open_store(config)?;
    let snapshot = store.load(&options.policy(config))?;
    let mut indexer = options.indexer(config, snapshot);

    let records = read_records(&self.input)?;
    let total = records.len();
    let blocks = into_blocks(records);
    log::info!(
      "Indexing {total} records in {} blocks from {}",
      blocks.len(),
      self.input.display()
    );

    let mut receipts: Vec<Receipt> = Vec::new();
    let mut indexed_blocks = 0;
    let mut interrupted = false;

    for block in &blocks {
      if SHUTTING_DOWN.load(atomic::Ordering::Relaxed) {
        log::warn!("Interrupted, committing progress");
        interrupted = true;
        break;
      }

      match indexer.apply_block(block) {
        Ok(block_receipts) => receipts.extend(block_receipts),
        Err(err) => {
          store.commit(&indexer, &receipts, &[])?;
          return Err(err).context("indexing halted, blocks before the failing one were committed");
        }
      }
      indexed_blocks += 1;
    }

    store.commit(&indexer, &receipts, &[])?;

    let seen: usize = blocks.iter().take(indexed_blocks).map(Vec::len).sum();
    let rejected = receipts
      .iter()
      .filter(|receipt| receipt.result.is_err())
      .count();

    Ok(Box::new(Output {
      blocks: u64::try_from(indexed_blocks)?,
      applied: u64::try_from(receipts.len())?,
      rejected: u64::try_from(rejected)?,
      skipped: u64::try_from(seen - receipts.len())?,
      last_sequence: indexer.state().last_sequence(),
      interrupted,
    }))
  }
}
