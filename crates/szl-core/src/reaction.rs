//! Reaction cycle for the decorative character widget.
//!
//! The renderer itself is a black box to this crate: it receives the current
//! expression and reports interactions by advancing the cycle. There is no
//! state here beyond a cyclic index over a fixed enumeration.

use serde::{Deserialize, Serialize};

/// The five expressions the character cycles through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expression {
  Happy,
  Grin,
  Tongue,
  Wink,
  Love,
}

impl Expression {
  const CYCLE: [Expression; 5] = [
    Expression::Happy,
    Expression::Grin,
    Expression::Tongue,
    Expression::Wink,
    Expression::Love,
  ];
}

/// Cyclic index over [`Expression::CYCLE`]; starts at `Happy`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReactionCycle {
  index: usize,
}

impl ReactionCycle {
  pub fn current(&self) -> Expression { Expression::CYCLE[self.index] }

  /// Advance on interaction and return the new expression.
  pub fn advance(&mut self) -> Expression {
    self.index = (self.index + 1) % Expression::CYCLE.len();
    self.current()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cycle_wraps_after_five_advances() {
    let mut cycle = ReactionCycle::default();
    assert_eq!(cycle.current(), Expression::Happy);
    let seen: Vec<_> = (0..5).map(|_| cycle.advance()).collect();
    assert_eq!(seen, vec![
      Expression::Grin,
      Expression::Tongue,
      Expression::Wink,
      Expression::Love,
      Expression::Happy,
    ]);
  }
}
