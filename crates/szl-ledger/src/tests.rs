//! Submission-flow tests against in-memory capability doubles.

use std::{
  sync::{Arc, Mutex},
  time::Duration,
};

use chrono::Utc;
use tokio::sync::Notify;
use uuid::Uuid;

use szl_core::{
  session::{InitiationRecord, SessionIdentity},
  store::MainframeStore,
  subject::{Division, NewSubject, Subject},
  transmission::{NewTransmission, SubjectDisplay, Transmission, TransmissionView},
};

use crate::{
  Error, SubmitFlow, SubmitPhase,
  client::{LedgerClient, LedgerError, WalletError, WalletSession},
  memo::{Blockhash, MemoTransaction, build_memo_transaction},
};

// ─── Wallet double ───────────────────────────────────────────────────────────

#[derive(Default)]
struct MockWallet {
  decline: bool,
  sent:    Mutex<Vec<MemoTransaction>>,
}

impl WalletSession for Arc<MockWallet> {
  fn address(&self) -> &str { "WaLLetAddre55" }

  async fn sign_and_send(&self, tx: &MemoTransaction) -> Result<String, WalletError> {
    if self.decline {
      return Err(WalletError::Declined);
    }
    let mut sent = self.sent.lock().unwrap();
    sent.push(tx.clone());
    Ok(format!("sig-{}", sent.len()))
  }
}

// ─── Ledger double ───────────────────────────────────────────────────────────

#[derive(Default)]
struct MockLedger {
  fail_blockhash: bool,
  fail_confirm:   bool,
  /// When set, `confirm_transaction` suspends until notified.
  confirm_gate:   Option<Arc<Notify>>,
  confirmed:      Mutex<Vec<String>>,
}

impl LedgerClient for Arc<MockLedger> {
  async fn latest_blockhash(&self) -> Result<Blockhash, LedgerError> {
    if self.fail_blockhash {
      return Err(LedgerError::Rpc("rpc node unreachable".into()));
    }
    Ok(Blockhash { hash: "HASH1111".into(), last_valid_block_height: 4242 })
  }

  async fn confirm_transaction(&self, signature: &str) -> Result<(), LedgerError> {
    if let Some(gate) = &self.confirm_gate {
      gate.notified().await;
    }
    if self.fail_confirm {
      return Err(LedgerError::ConfirmationFailed {
        signature: signature.to_owned(),
        reason:    "block height exceeded".into(),
      });
    }
    self.confirmed.lock().unwrap().push(signature.to_owned());
    Ok(())
  }
}

// ─── Store double ────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
enum MockStoreError {
  #[error("store offline")]
  Offline,
}

#[derive(Default)]
struct MemStore {
  fail_append:   bool,
  fail_find:     bool,
  subjects:      Mutex<Vec<Subject>>,
  transmissions: Mutex<Vec<Transmission>>,
}

impl MemStore {
  fn seed_subject(&self, token: &str, division: Division) -> Subject {
    let subject = Subject {
      id: Uuid::new_v4(),
      subject_token: token.to_owned(),
      division,
      answers: vec![0, 2, 1, 3, 0],
      wallet_address: None,
      created_at: Utc::now(),
    };
    self.subjects.lock().unwrap().push(subject.clone());
    subject
  }

  fn display_for(&self, subject_id: Option<Uuid>) -> Option<SubjectDisplay> {
    let subjects = self.subjects.lock().unwrap();
    subject_id
      .and_then(|id| subjects.iter().find(|s| s.id == id))
      .map(SubjectDisplay::from)
  }
}

impl MainframeStore for MemStore {
  type Error = MockStoreError;

  async fn get_or_create_subject(&self, input: NewSubject) -> Result<Subject, MockStoreError> {
    let mut subjects = self.subjects.lock().unwrap();
    if let Some(existing) =
      subjects.iter().find(|s| s.subject_token == input.subject_token)
    {
      return Ok(existing.clone());
    }
    let subject = Subject {
      id:             Uuid::new_v4(),
      subject_token:  input.subject_token,
      division:       input.division,
      answers:        input.answers,
      wallet_address: input.wallet_address,
      created_at:     Utc::now(),
    };
    subjects.push(subject.clone());
    Ok(subject)
  }

  async fn find_subject(&self, token: &str) -> Result<Option<Subject>, MockStoreError> {
    if self.fail_find {
      return Err(MockStoreError::Offline);
    }
    let subjects = self.subjects.lock().unwrap();
    Ok(subjects.iter().find(|s| s.subject_token == token).cloned())
  }

  async fn append_transmission(
    &self,
    input: NewTransmission,
  ) -> Result<TransmissionView, MockStoreError> {
    if self.fail_append {
      return Err(MockStoreError::Offline);
    }
    let transmission = Transmission {
      id:         Uuid::new_v4(),
      content:    input.content().to_owned(),
      subject_id: input.subject_id,
      ledger:     input.ledger.clone(),
      created_at: Utc::now(),
    };
    self.transmissions.lock().unwrap().push(transmission.clone());
    let subject = self.display_for(transmission.subject_id);
    Ok(TransmissionView { transmission, subject })
  }

  async fn list_recent(&self, limit: usize) -> Result<Vec<TransmissionView>, MockStoreError> {
    let transmissions = self.transmissions.lock().unwrap();
    Ok(
      transmissions
        .iter()
        .rev()
        .take(limit.min(szl_core::store::FEED_LIMIT))
        .map(|t| TransmissionView {
          transmission: t.clone(),
          subject:      self.display_for(t.subject_id),
        })
        .collect(),
    )
  }
}

// ─── Harness ─────────────────────────────────────────────────────────────────

struct Harness {
  wallet: Arc<MockWallet>,
  ledger: Arc<MockLedger>,
  store:  Arc<MemStore>,
  flow:   SubmitFlow<Arc<MockWallet>, Arc<MockLedger>, Arc<MemStore>>,
}

fn harness(wallet: MockWallet, ledger: MockLedger, store: MemStore) -> Harness {
  let wallet = Arc::new(wallet);
  let ledger = Arc::new(ledger);
  let store = Arc::new(store);
  let flow = SubmitFlow::new(wallet.clone(), ledger.clone(), store.clone());
  Harness { wallet, ledger, store, flow }
}

fn initiated_session(token: &str) -> SessionIdentity {
  SessionIdentity::initiated(InitiationRecord {
    subject_token:  token.to_owned(),
    division:       Division::VoidWalkers,
    answers:        vec![0, 2, 1, 3, 0],
    wallet_address: None,
  })
}

// ─── Happy path ──────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn successful_submission_confirms_then_persists() {
  let h = harness(MockWallet::default(), MockLedger::default(), MemStore::default());

  let outcome = h
    .flow
    .submit("  hello mainframe  ", &SessionIdentity::anonymous())
    .await
    .unwrap();

  assert!(outcome.warning.is_none());
  assert_eq!(outcome.view.transmission.content, "hello mainframe");
  let ledger_ref = outcome.view.transmission.ledger.as_ref().unwrap();
  assert_eq!(ledger_ref.tx_signature, "sig-1");
  assert_eq!(ledger_ref.wallet_address, "WaLLetAddre55");

  // Confirmation happened before the record was persisted.
  assert_eq!(*h.ledger.confirmed.lock().unwrap(), vec!["sig-1".to_string()]);
  assert_eq!(h.store.transmissions.lock().unwrap().len(), 1);

  // Terminal phase, then back to idle after the success cooldown.
  assert_eq!(h.flow.phase(), SubmitPhase::Success);
  tokio::time::sleep(Duration::from_secs(3)).await;
  assert_eq!(h.flow.phase(), SubmitPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn memo_carries_the_freshness_reference_and_fee_payer() {
  let h = harness(MockWallet::default(), MockLedger::default(), MemStore::default());

  h.flow.submit("ping", &SessionIdentity::anonymous()).await.unwrap();

  let sent = h.wallet.sent.lock().unwrap();
  assert_eq!(sent.len(), 1);
  assert_eq!(sent[0].fee_payer, "WaLLetAddre55");
  assert_eq!(sent[0].memo, "ping");
  assert_eq!(sent[0].recent_blockhash.hash, "HASH1111");
  assert_eq!(sent[0].recent_blockhash.last_valid_block_height, 4242);
}

// ─── Subject linkage ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn initiated_session_links_the_subject() {
  let store = MemStore::default();
  let subject = store.seed_subject("SZL-AB3KQ", Division::VoidWalkers);
  let h = harness(MockWallet::default(), MockLedger::default(), store);

  let outcome = h
    .flow
    .submit("linked", &initiated_session("SZL-AB3KQ"))
    .await
    .unwrap();

  assert!(outcome.warning.is_none());
  assert_eq!(outcome.view.transmission.subject_id, Some(subject.id));
  let display = outcome.view.subject.unwrap();
  assert_eq!(display.subject_token, "SZL-AB3KQ");
  assert_eq!(display.division, Division::VoidWalkers);
}

#[tokio::test(start_paused = true)]
async fn unregistered_subject_posts_unlinked_with_warning() {
  let h = harness(MockWallet::default(), MockLedger::default(), MemStore::default());

  let outcome = h
    .flow
    .submit("ghost", &initiated_session("SZL-NOPE2"))
    .await
    .unwrap();

  assert!(outcome.warning.is_some());
  assert_eq!(outcome.view.transmission.subject_id, None);
  assert!(outcome.view.subject.is_none());
}

#[tokio::test(start_paused = true)]
async fn subject_lookup_failure_is_a_nonfatal_warning() {
  let store = MemStore { fail_find: true, ..Default::default() };
  let h = harness(MockWallet::default(), MockLedger::default(), store);

  let outcome = h
    .flow
    .submit("still goes out", &initiated_session("SZL-AB3KQ"))
    .await
    .unwrap();

  let warning = outcome.warning.unwrap();
  assert!(warning.contains("subject lookup failed"));
  assert_eq!(outcome.view.transmission.subject_id, None);
  assert_eq!(h.store.transmissions.lock().unwrap().len(), 1);
}

// ─── Failure classification ──────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn declined_signature_is_user_declined_and_persists_nothing() {
  let wallet = MockWallet { decline: true, ..Default::default() };
  let h = harness(wallet, MockLedger::default(), MemStore::default());

  let err = h
    .flow
    .submit("unsigned", &SessionIdentity::anonymous())
    .await
    .unwrap_err();

  assert!(matches!(err, Error::UserDeclined));
  assert!(h.store.transmissions.lock().unwrap().is_empty());
  assert!(h.ledger.confirmed.lock().unwrap().is_empty());
  assert!(matches!(h.flow.phase(), SubmitPhase::Failed(_)));

  // Failed resets to idle after the error cooldown.
  tokio::time::sleep(Duration::from_secs(5)).await;
  assert_eq!(h.flow.phase(), SubmitPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn missing_freshness_reference_is_upstream_unavailable() {
  let ledger = MockLedger { fail_blockhash: true, ..Default::default() };
  let h = harness(MockWallet::default(), ledger, MemStore::default());

  let err = h
    .flow
    .submit("no blockhash", &SessionIdentity::anonymous())
    .await
    .unwrap_err();

  assert!(matches!(err, Error::UpstreamUnavailable(_)));
  // The wallet was never asked to sign.
  assert!(h.wallet.sent.lock().unwrap().is_empty());
  assert!(h.store.transmissions.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn failed_confirmation_never_persists() {
  let ledger = MockLedger { fail_confirm: true, ..Default::default() };
  let h = harness(MockWallet::default(), ledger, MemStore::default());

  let err = h
    .flow
    .submit("unconfirmed", &SessionIdentity::anonymous())
    .await
    .unwrap_err();

  assert!(matches!(err, Error::UpstreamUnavailable(_)));
  assert!(h.store.transmissions.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn store_failure_after_confirmation_is_surfaced() {
  let store = MemStore { fail_append: true, ..Default::default() };
  let h = harness(MockWallet::default(), MockLedger::default(), store);

  let err = h
    .flow
    .submit("orphaned on chain", &SessionIdentity::anonymous())
    .await
    .unwrap_err();

  // The ledger-side effect exists; the failure is reported, not hidden.
  assert!(matches!(err, Error::StoreUnavailable(_)));
  assert_eq!(h.ledger.confirmed.lock().unwrap().len(), 1);
}

// ─── Gating ──────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn validation_failure_never_occupies_the_flow() {
  let h = harness(MockWallet::default(), MockLedger::default(), MemStore::default());

  let err = h
    .flow
    .submit("   ", &SessionIdentity::anonymous())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Validation(szl_core::Error::EmptyContent)));
  assert_eq!(h.flow.phase(), SubmitPhase::Idle);

  let long = "x".repeat(281);
  let err = h
    .flow
    .submit(&long, &SessionIdentity::anonymous())
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Validation(szl_core::Error::ContentTooLong { .. })
  ));

  // The flow is immediately usable again.
  h.flow.submit("fine", &SessionIdentity::anonymous()).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn second_submission_is_refused_while_one_is_in_flight() {
  let gate = Arc::new(Notify::new());
  let ledger = MockLedger {
    confirm_gate: Some(gate.clone()),
    ..Default::default()
  };
  let h = harness(MockWallet::default(), ledger, MemStore::default());
  let flow = Arc::new(h.flow);

  let first = {
    let flow = flow.clone();
    tokio::spawn(async move {
      flow.submit("first", &SessionIdentity::anonymous()).await
    })
  };

  // Let the first submission reach the confirming phase.
  let mut rx = flow.subscribe();
  rx.wait_for(|p| *p == SubmitPhase::Confirming).await.unwrap();

  let err = flow
    .submit("second", &SessionIdentity::anonymous())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SubmissionInFlight));

  // The refusal left the in-flight attempt unharmed.
  gate.notify_one();
  let outcome = first.await.unwrap().unwrap();
  assert_eq!(outcome.view.transmission.content, "first");
  assert_eq!(h.store.transmissions.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn flow_stays_busy_through_the_error_cooldown() {
  let wallet = MockWallet { decline: true, ..Default::default() };
  let h = harness(wallet, MockLedger::default(), MemStore::default());

  h.flow
    .submit("declined", &SessionIdentity::anonymous())
    .await
    .unwrap_err();

  // Still in the cooldown window: refused.
  let err = h
    .flow
    .submit("too soon", &SessionIdentity::anonymous())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SubmissionInFlight));

  tokio::time::sleep(Duration::from_secs(5)).await;
  assert_eq!(h.flow.phase(), SubmitPhase::Idle);
}

// ─── Memo builder ────────────────────────────────────────────────────────────

#[tokio::test]
async fn build_memo_transaction_is_pure_construction() {
  let ledger = Arc::new(MockLedger::default());

  let tx = build_memo_transaction(&ledger, "FeePayer1", "the memo").await.unwrap();

  assert_eq!(tx.fee_payer, "FeePayer1");
  assert_eq!(tx.memo, "the memo");
  assert_eq!(tx.recent_blockhash.hash, "HASH1111");
  // Nothing was confirmed or sent anywhere.
  assert!(ledger.confirmed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn build_memo_transaction_fails_without_a_freshness_reference() {
  let ledger = Arc::new(MockLedger { fail_blockhash: true, ..Default::default() });

  let err = build_memo_transaction(&ledger, "FeePayer1", "memo").await.unwrap_err();
  assert!(matches!(err, Error::UpstreamUnavailable(_)));
}
