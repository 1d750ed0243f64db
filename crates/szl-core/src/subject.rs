//! Subject — a persistent identity assigned at the end of the initiation
//! questionnaire.
//!
//! A subject is created exactly once per token and never updated afterwards.
//! The division is derived from the raw answer indices at creation time and
//! travels with the record; it is never re-derived from stored answers.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Division ────────────────────────────────────────────────────────────────

/// The four divisions a subject can be classified into.
///
/// The string forms are the uppercase display labels; they appear verbatim on
/// the wire and in the database.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
pub enum Division {
  #[serde(rename = "SIGNAL CORPS")]
  #[strum(serialize = "SIGNAL CORPS")]
  SignalCorps,
  #[serde(rename = "VOID WALKERS")]
  #[strum(serialize = "VOID WALKERS")]
  VoidWalkers,
  #[serde(rename = "PATTERN SEEKERS")]
  #[strum(serialize = "PATTERN SEEKERS")]
  PatternSeekers,
  #[serde(rename = "STATIC DWELLERS")]
  #[strum(serialize = "STATIC DWELLERS")]
  StaticDwellers,
}

impl Division {
  const ALL: [Division; 4] = [
    Division::SignalCorps,
    Division::VoidWalkers,
    Division::PatternSeekers,
    Division::StaticDwellers,
  ];

  /// Classify a completed questionnaire: the sum of the raw answer indices,
  /// modulo the number of divisions.
  pub fn from_answers(answers: &[u8]) -> Division {
    let sum: usize = answers.iter().map(|&a| a as usize).sum();
    Self::ALL[sum % Self::ALL.len()]
  }
}

// ─── Token generation ────────────────────────────────────────────────────────

/// Alphabet for subject tokens. Excludes `I`, `O`, `0`, and `1` so tokens
/// survive being read aloud or retyped.
const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of random characters after the `SZL-` prefix.
const TOKEN_LEN: usize = 5;

/// Generate a fresh subject token, e.g. `SZL-AB3KQ`.
///
/// Tokens are not guaranteed unique by construction; the directory's unique
/// constraint is what prevents collisions from producing duplicate records.
pub fn generate_subject_token(rng: &mut impl Rng) -> String {
  let mut token = String::with_capacity(4 + TOKEN_LEN);
  token.push_str("SZL-");
  for _ in 0..TOKEN_LEN {
    let idx = rng.gen_range(0..TOKEN_ALPHABET.len());
    token.push(TOKEN_ALPHABET[idx] as char);
  }
  token
}

/// Cosmetic alignment percentage shown on the subject's badge, derived
/// deterministically from the token. Always in `77..=99`.
pub fn alignment_score(subject_token: &str) -> u8 {
  let sum: u32 = subject_token.bytes().map(u32::from).sum();
  (sum % 23 + 77) as u8
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// Input for [`get_or_create_subject`](crate::store::MainframeStore).
///
/// When the token already exists in the directory, every other field is
/// ignored — first write wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubject {
  pub subject_token:  String,
  pub division:       Division,
  /// Raw answer indices from the questionnaire, in question order.
  pub answers:        Vec<u8>,
  /// Account address connected at initiation time, if any. Set at most once;
  /// a subject created without one is never retroactively linked.
  pub wallet_address: Option<String>,
}

/// A persisted subject. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
  pub id:             Uuid,
  pub subject_token:  String,
  pub division:       Division,
  pub answers:        Vec<u8>,
  pub wallet_address: Option<String>,
  pub created_at:     DateTime<Utc>,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn division_from_answers_is_modulo_sum() {
    assert_eq!(Division::from_answers(&[0, 0, 0, 0, 0]), Division::SignalCorps);
    assert_eq!(Division::from_answers(&[1, 0, 0, 0, 0]), Division::VoidWalkers);
    assert_eq!(Division::from_answers(&[0, 2, 1, 3, 0]), Division::PatternSeekers);
    assert_eq!(Division::from_answers(&[3, 3, 1, 0, 0]), Division::StaticDwellers);
    // Wraps past the end of the enumeration.
    assert_eq!(Division::from_answers(&[3, 3, 2, 0, 0]), Division::SignalCorps);
  }

  #[test]
  fn division_round_trips_through_display() {
    use std::str::FromStr as _;
    for d in Division::ALL {
      assert_eq!(Division::from_str(&d.to_string()).unwrap(), d);
    }
    assert_eq!(Division::VoidWalkers.to_string(), "VOID WALKERS");
  }

  #[test]
  fn generated_tokens_have_the_expected_shape() {
    let mut rng = rand::thread_rng();
    for _ in 0..100 {
      let token = generate_subject_token(&mut rng);
      assert_eq!(token.len(), 9);
      assert!(token.starts_with("SZL-"));
      assert!(token[4..].bytes().all(|b| TOKEN_ALPHABET.contains(&b)));
    }
  }

  #[test]
  fn alignment_score_is_deterministic_and_bounded() {
    let score = alignment_score("SZL-AB3KQ");
    assert_eq!(score, alignment_score("SZL-AB3KQ"));
    assert!((77..=99).contains(&score));
  }
}
