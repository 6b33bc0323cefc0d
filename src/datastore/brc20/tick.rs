use super::*;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{
  fmt::{self, Display, Formatter},
  str::FromStr,
};

pub const TICK_CHAR_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tick(String);

impl FromStr for Tick {
  type Err = BRC20Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let count = s.chars().count();
    if count == 0 || count > TICK_CHAR_COUNT {
      return Err(BRC20Error::InvalidTickLen(s.to_string()));
    }
    if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
      return Err(BRC20Error::InvalidTickChar(s.to_string()));
    }
    Ok(Self(s.to_string()))
  }
}

impl Tick {
  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn to_lowercase(&self) -> Tick {
    Self(self.0.to_lowercase())
  }

  pub fn hex(&self) -> String {
    hex::encode(self.0.as_bytes())
  }

  pub fn from_hex(s: &str) -> Option<Tick> {
    String::from_utf8(hex::decode(s).ok()?)
      .ok()?
      .parse()
      .ok()
  }
}

impl Display for Tick {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl Serialize for Tick {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    self.as_str().serialize(serializer)
  }
}

impl<'de> Deserialize<'de> for Tick {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    Self::from_str(&String::deserialize(deserializer)?)
      .map_err(|e| de::Error::custom(format!("deserialize tick error: {}", e)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_tick_length_in_code_points() {
    assert!(Tick::from_str("MYTK").is_ok());
    assert!(Tick::from_str("a").is_ok());
    assert!(Tick::from_str("😀😀😀😀").is_ok());
    assert_eq!(
      Tick::from_str(""),
      Err(BRC20Error::InvalidTickLen(String::new()))
    );
    assert_eq!(
      Tick::from_str("abcde"),
      Err(BRC20Error::InvalidTickLen("abcde".to_string()))
    );
  }

  #[test]
  fn test_tick_rejects_blank_chars() {
    assert_eq!(
      Tick::from_str("ab 1"),
      Err(BRC20Error::InvalidTickChar("ab 1".to_string()))
    );
    assert_eq!(
      Tick::from_str("ab\n"),
      Err(BRC20Error::InvalidTickChar("ab\n".to_string()))
    );
  }

  #[test]
  fn test_tick_lowercase() {
    assert_eq!(
      Tick::from_str("MyTk").unwrap().to_lowercase(),
      Tick::from_str("mytk").unwrap()
    );
    assert_ne!(Tick::from_str("MyTk"), Tick::from_str("mytk"));
  }

  #[test]
  fn test_tick_hex_round_trip() {
    let tick = Tick::from_str("ab1;").unwrap();
    assert_eq!(tick.hex(), "6162313b");
    assert_eq!(Tick::from_hex(&tick.hex()), Some(tick));
    assert_eq!(Tick::from_hex("zz"), None);
  }

  #[test]
  fn test_tick_serde() {
    let obj = Tick::from_str("Ab1;").unwrap();
    assert_eq!(serde_json::to_string(&obj).unwrap(), r##""Ab1;""##);
    assert_eq!(serde_json::from_str::<Tick>(r##""Ab1;""##).unwrap(), obj);
    assert!(serde_json::from_str::<Tick>(r##""abcde""##).is_err());
  }
}
