use super::*;
use crate::protocol::Policy;

/// Settings read from the YAML file given with `--config`. Every field can be
/// overridden on the command line.
#[derive(Deserialize, Serialize, Default, PartialEq, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  pub policy: Policy,
  pub max_reorg_depth: Option<u64>,
  pub data_dir: Option<PathBuf>,
  pub log_dir: Option<PathBuf>,
}

impl Config {
  pub fn load(path: &Path) -> Result<Self> {
    let file = std::fs::File::open(path)
      .with_context(|| format!("failed to open config file `{}`", path.display()))?;
    serde_yaml::from_reader(file)
      .with_context(|| format!("failed to parse config file `{}`", path.display()))
  }
}
