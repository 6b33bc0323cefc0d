use super::{error::NumError, params::MAX_DECIMAL_WIDTH};
use bigdecimal::{
  num_bigint::{BigInt, Sign, ToBigInt},
  BigDecimal, One, ToPrimitive,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
  fmt::{Display, Formatter},
  str::FromStr,
};

/// A non-negative decimal as written in inscription payloads.
#[derive(PartialEq, PartialOrd, Debug, Clone)]
pub struct Num(BigDecimal);

impl Num {
  pub fn checked_add(&self, other: &Num) -> Result<Self, NumError> {
    Ok(Self(self.0.clone() + &other.0))
  }

  pub fn checked_sub(&self, other: &Num) -> Result<Self, NumError> {
    if self.0 < other.0 {
      return Err(NumError::Overflow {
        op: String::from("checked_sub"),
        org: self.clone(),
        other: other.clone(),
      });
    }

    Ok(Self(self.0.clone() - &other.0))
  }

  pub fn checked_mul(&self, other: &Num) -> Result<Self, NumError> {
    Ok(Self(self.0.clone() * &other.0))
  }

  pub fn checked_powu(&self, exp: u64) -> Result<Self, NumError> {
    match exp {
      0 => Ok(Self(BigDecimal::one())),
      1 => Ok(Self(self.0.clone())),
      exp => {
        let mut result = self.0.clone();
        for _ in 1..exp {
          result = result * &self.0;
        }

        Ok(Self(result))
      }
    }
  }

  pub fn checked_to_u8(&self) -> Result<u8, NumError> {
    if !self.0.is_integer() {
      return Err(NumError::InvalidInteger(self.clone()));
    }
    self.0.to_u8().ok_or(NumError::Overflow {
      op: String::from("to_u8"),
      org: self.clone(),
      other: Self(BigDecimal::from(u8::MAX)),
    })
  }

  pub fn checked_to_u128(&self) -> Result<u128, NumError> {
    if !self.0.is_integer() {
      return Err(NumError::InvalidInteger(self.clone()));
    }
    self
      .0
      .to_bigint()
      .ok_or(NumError::InternalError(format!(
        "convert {} to bigint failed",
        self.0
      )))?
      .to_u128()
      .ok_or(NumError::Overflow {
        op: String::from("to_u128"),
        org: self.clone(),
        other: Self::from(u128::MAX),
      })
  }

  pub fn sign(&self) -> Sign {
    self.0.sign()
  }

  /// Number of fractional digits, trailing zeros excluded.
  pub fn scale(&self) -> i64 {
    let (_, scale) = self.0.as_bigint_and_exponent();
    scale
  }
}

impl From<u64> for Num {
  fn from(n: u64) -> Self {
    Self(BigDecimal::from(n))
  }
}

impl From<u128> for Num {
  fn from(n: u128) -> Self {
    Self(BigDecimal::from(BigInt::from(n)))
  }
}

impl FromStr for Num {
  type Err = NumError;

  /// Accepts plain decimal digits with at most one interior dot. Signs,
  /// exponents, blanks and more than 18 significant fractional digits are
  /// rejected.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = || NumError::InvalidNum(s.to_string());

    if s.is_empty()
      || s.starts_with('.')
      || s.ends_with('.')
      || s.chars().any(|c| !c.is_ascii_digit() && c != '.')
    {
      return Err(invalid());
    }

    let (integer, fraction) = s.split_once('.').unwrap_or((s, ""));
    if fraction.contains('.') {
      return Err(invalid());
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > usize::from(MAX_DECIMAL_WIDTH) {
      return Err(invalid());
    }

    let digits = BigInt::from_str(&format!("{integer}{fraction}")).map_err(|_| invalid())?;
    let scale = i64::try_from(fraction.len()).map_err(|_| invalid())?;

    Ok(Self(BigDecimal::new(digits, scale)))
  }
}

impl Display for Num {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    self.0.fmt(f)
  }
}

impl Serialize for Num {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for Num {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    Self::from_str(&String::deserialize(deserializer)?).map_err(serde::de::Error::custom)
  }
}
