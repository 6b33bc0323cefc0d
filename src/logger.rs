use super::*;
use log::LevelFilter;
use log4rs::{
  append::{
    console::{ConsoleAppender, Target},
    rolling_file::{
      policy::compound::{
        roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy,
      },
      RollingFileAppender,
    },
  },
  config::{Appender, Root},
  encode::pattern::PatternEncoder,
};

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {h({l:<5})} {t} - {m}{n}";
const LOG_FILE_SIZE: u64 = 64 * 1024 * 1024;
const LOG_FILE_COUNT: u32 = 5;

/// Logs go to stderr, leaving stdout to the JSON output. With a log dir they
/// are also written to a size-rotated file, old files gzipped.
pub(crate) fn init(level: LevelFilter, log_dir: Option<&Path>) -> Result {
  let stderr = ConsoleAppender::builder()
    .target(Target::Stderr)
    .encoder(Box::new(PatternEncoder::new(PATTERN)))
    .build();

  let mut builder =
    log4rs::Config::builder().appender(Appender::builder().build("stderr", Box::new(stderr)));
  let mut root = Root::builder().appender("stderr");

  if let Some(log_dir) = log_dir {
    std::fs::create_dir_all(log_dir)
      .with_context(|| format!("failed to create log dir `{}`", log_dir.display()))?;

    let roller = FixedWindowRoller::builder().build(
      &log_dir.join("brc20-indexer.{}.log.gz").to_string_lossy(),
      LOG_FILE_COUNT,
    )?;
    let policy = CompoundPolicy::new(
      Box::new(SizeTrigger::new(LOG_FILE_SIZE)),
      Box::new(roller),
    );
    let file = RollingFileAppender::builder()
      .encoder(Box::new(PatternEncoder::new(PATTERN)))
      .build(log_dir.join("brc20-indexer.log"), Box::new(policy))?;

    builder = builder.appender(Appender::builder().build("file", Box::new(file)));
    root = root.appender("file");
  }

  log4rs::init_config(builder.build(root.build(level))?)?;

  Ok(())
}
