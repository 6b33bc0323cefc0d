use {super::*, bitcoin::Txid};

/// Identifies an inscription by the reveal transaction and the envelope index
/// inside it, rendered as `<txid>i<index>`.
#[derive(Debug, PartialEq, Copy, Clone, Hash, Eq, PartialOrd, Ord)]
pub struct InscriptionId {
  pub txid: Txid,
  pub index: u32,
}

impl InscriptionId {
  pub fn new(txid: Txid, index: u32) -> Self {
    Self { txid, index }
  }
}

impl Display for InscriptionId {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}i{}", self.txid, self.index)
  }
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ParseError {
  #[error("invalid length: {0}")]
  Length(usize),
  #[error("invalid separator: `{0}`")]
  Separator(char),
  #[error("invalid txid: {0}")]
  Txid(String),
  #[error("invalid index: {0}")]
  Index(std::num::ParseIntError),
}

impl FromStr for InscriptionId {
  type Err = ParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    const TXID_LEN: usize = 64;
    const MIN_LEN: usize = TXID_LEN + 2;

    if s.len() < MIN_LEN || !s.is_char_boundary(TXID_LEN) {
      return Err(ParseError::Length(s.len()));
    }

    let (txid, rest) = s.split_at(TXID_LEN);

    let mut chars = rest.chars();
    match chars.next() {
      Some('i') => {}
      Some(separator) => return Err(ParseError::Separator(separator)),
      None => return Err(ParseError::Length(s.len())),
    }

    Ok(Self {
      txid: txid
        .parse::<Txid>()
        .map_err(|err| ParseError::Txid(err.to_string()))?,
      index: chars.as_str().parse().map_err(ParseError::Index)?,
    })
  }
}

impl Serialize for InscriptionId {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for InscriptionId {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    String::deserialize(deserializer)?
      .parse()
      .map_err(serde::de::Error::custom)
  }
}
