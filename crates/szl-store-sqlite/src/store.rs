//! [`SqliteStore`] — the SQLite implementation of [`MainframeStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use szl_core::{
  store::{FEED_LIMIT, MainframeStore},
  subject::{NewSubject, Subject},
  transmission::{NewTransmission, SubjectDisplay, Transmission, TransmissionView},
};

use crate::{
  Error, Result,
  encode::{
    RawSubject, RawTransmission, decode_division, encode_answers,
    encode_division, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An SZL mainframe store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

const SUBJECT_COLS: &str =
  "id, subject_token, division, answers, wallet_address, created_at";

fn subject_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSubject> {
  Ok(RawSubject {
    id:             row.get(0)?,
    subject_token:  row.get(1)?,
    division:       row.get(2)?,
    answers:        row.get(3)?,
    wallet_address: row.get(4)?,
    created_at:     row.get(5)?,
  })
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── MainframeStore impl ─────────────────────────────────────────────────────

impl MainframeStore for SqliteStore {
  type Error = Error;

  // ── Subject directory ─────────────────────────────────────────────────────

  async fn get_or_create_subject(&self, input: NewSubject) -> Result<Subject> {
    let id_str       = encode_uuid(Uuid::new_v4());
    let token        = input.subject_token.clone();
    let division_str = encode_division(input.division);
    let answers_str  = encode_answers(&input.answers)?;
    let wallet       = input.wallet_address.clone();
    let at_str       = encode_dt(Utc::now());

    let raw: RawSubject = self
      .conn
      .call(move |conn| {
        // First write wins: the unique constraint on subject_token turns a
        // repeated creation into a no-op, and the SELECT below returns
        // whichever row actually landed.
        conn.execute(
          "INSERT INTO subjects
             (id, subject_token, division, answers, wallet_address, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT(subject_token) DO NOTHING",
          rusqlite::params![id_str, token, division_str, answers_str, wallet, at_str],
        )?;

        Ok(conn.query_row(
          &format!("SELECT {SUBJECT_COLS} FROM subjects WHERE subject_token = ?1"),
          rusqlite::params![token],
          subject_from_row,
        )?)
      })
      .await?;

    raw.into_subject()
  }

  async fn find_subject(&self, subject_token: &str) -> Result<Option<Subject>> {
    let token = subject_token.to_owned();

    let raw: Option<RawSubject> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SUBJECT_COLS} FROM subjects WHERE subject_token = ?1"),
              rusqlite::params![token],
              subject_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSubject::into_subject).transpose()
  }

  // ── Transmission feed ─────────────────────────────────────────────────────

  async fn append_transmission(&self, input: NewTransmission) -> Result<TransmissionView> {
    let transmission = Transmission {
      id:         Uuid::new_v4(),
      content:    input.content().to_owned(),
      subject_id: input.subject_id,
      ledger:     input.ledger,
      created_at: Utc::now(),
    };

    let id_str         = encode_uuid(transmission.id);
    let content        = transmission.content.clone();
    let subject_id_str = transmission.subject_id.map(encode_uuid);
    let tx_signature   = transmission.ledger.as_ref().map(|l| l.tx_signature.clone());
    let wallet_address =
      transmission.ledger.as_ref().map(|l| l.wallet_address.clone());
    let at_str         = encode_dt(transmission.created_at);

    // Insert, then resolve the denormalised subject fields in the same call.
    let display: Option<(String, String)> = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO transmissions
             (id, content, subject_id, tx_signature, wallet_address, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str,
            content,
            subject_id_str,
            tx_signature,
            wallet_address,
            at_str,
          ],
        )?;

        let display = match subject_id_str {
          Some(ref sid) => conn
            .query_row(
              "SELECT subject_token, division FROM subjects WHERE id = ?1",
              rusqlite::params![sid],
              |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?,
          None => None,
        };
        Ok(display)
      })
      .await?;

    let subject = display
      .map(|(subject_token, division)| {
        Ok::<_, Error>(SubjectDisplay {
          subject_token,
          division: decode_division(&division)?,
        })
      })
      .transpose()?;

    Ok(TransmissionView { transmission, subject })
  }

  async fn list_recent(&self, limit: usize) -> Result<Vec<TransmissionView>> {
    let limit_val = limit.min(FEED_LIMIT) as i64;

    let raws: Vec<(RawTransmission, Option<String>, Option<String>)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             t.id, t.content, t.subject_id, t.tx_signature, t.wallet_address,
             t.created_at,
             s.subject_token, s.division
           FROM transmissions t
           LEFT JOIN subjects s ON s.id = t.subject_id
           ORDER BY t.created_at DESC, t.rowid DESC
           LIMIT ?1",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![limit_val], |row| {
            Ok((
              RawTransmission {
                id:             row.get(0)?,
                content:        row.get(1)?,
                subject_id:     row.get(2)?,
                tx_signature:   row.get(3)?,
                wallet_address: row.get(4)?,
                created_at:     row.get(5)?,
              },
              row.get(6)?,
              row.get(7)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(raw, token, division)| {
        let transmission = raw.into_transmission()?;
        let subject = match (token, division) {
          (Some(subject_token), Some(division)) => Some(SubjectDisplay {
            subject_token,
            division: decode_division(&division)?,
          }),
          _ => None,
        };
        Ok(TransmissionView { transmission, subject })
      })
      .collect()
  }
}
