use {
  serde::{Deserialize, Serialize},
  std::{
    convert::Infallible,
    fmt::{self, Display, Formatter},
    str::FromStr,
  },
};

/// Owner of balances and transfer inscriptions. The decoder hands addresses
/// over already rendered, so the key is the address string itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ScriptKey(String);

impl ScriptKey {
  pub fn from_address(address: impl Into<String>) -> Self {
    Self(address.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl FromStr for ScriptKey {
  type Err = Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(Self::from_address(s))
  }
}

impl Display for ScriptKey {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    f.write_str(&self.0)
  }
}
