use super::*;

/// Canonical chain position of an inscription event: block height first,
/// then the event's index inside the block.
#[derive(
  Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Sequence {
  pub height: u64,
  pub index: u32,
}

impl Sequence {
  pub fn new(height: u64, index: u32) -> Self {
    Self { height, index }
  }

  /// Fixed width rendering whose lexicographic order matches `Ord`, used as a
  /// database key.
  pub(crate) fn store_key(&self) -> String {
    format!("{:020}:{:010}", self.height, self.index)
  }
}

impl Display for Sequence {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}:{}", self.height, self.index)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ordered_by_height_then_index() {
    assert!(Sequence::new(1, 9) < Sequence::new(2, 0));
    assert!(Sequence::new(2, 0) < Sequence::new(2, 1));
  }

  #[test]
  fn store_key_preserves_order() {
    let a = Sequence::new(9, 100);
    let b = Sequence::new(10, 2);
    assert!(a < b);
    assert!(a.store_key() < b.store_key());
  }
}
