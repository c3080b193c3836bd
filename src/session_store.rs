//! Saved sessions: the generated report together with the inputs it was built from.
//!
//! Each session is stored as a JSON record tagged with its schema version. Records written
//! by the older browser build (camelCase keys, `createdAt.seconds`) come in through
//! [`parse_legacy_export`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::analysis::ProfileInputs;
use crate::generate::{GeneratedText, Source};
use crate::persist::app_cache_dir;

pub const SESSION_SCHEMA: &str = "v1";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unsupported session schema {0:?}")]
    UnsupportedSchema(String),
    #[error("session is missing {0}")]
    MissingField(&'static str),
    #[error("malformed session json")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSession {
    pub id: String,
    pub team_a: String,
    pub team_b: String,
    pub profile_text: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    /// Unix seconds.
    pub created_at: i64,
    pub inputs: ProfileInputs,
}

impl SavedSession {
    pub fn new(
        team_a: &str,
        team_b: &str,
        profile: &GeneratedText,
        inputs: &ProfileInputs,
    ) -> Result<Self, SessionError> {
        let session = Self {
            id: Uuid::new_v4().to_string(),
            team_a: team_a.trim().to_string(),
            team_b: team_b.trim().to_string(),
            profile_text: profile.text.clone(),
            sources: profile.sources.clone(),
            created_at: Utc::now().timestamp(),
            inputs: inputs.clone(),
        };
        session.validate()?;
        Ok(session)
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.id.trim().is_empty() {
            return Err(SessionError::MissingField("id"));
        }
        if self.team_a.trim().is_empty() || self.team_b.trim().is_empty() {
            return Err(SessionError::MissingField("team names"));
        }
        if self.profile_text.trim().is_empty() {
            return Err(SessionError::MissingField("profile text"));
        }
        Ok(())
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at, 0)
    }

    pub fn title(&self) -> String {
        format!("{} vs {}", self.team_a, self.team_b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "schema")]
pub enum SessionRecord {
    #[serde(rename = "v1")]
    V1(SavedSession),
}

pub fn encode_record(session: &SavedSession) -> Result<String, SessionError> {
    Ok(serde_json::to_string(&SessionRecord::V1(session.clone()))?)
}

/// Rejects records without a known `schema` tag before looking at the rest.
pub fn decode_record(raw: &str) -> Result<SavedSession, SessionError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let schema = value
        .get("schema")
        .and_then(|s| s.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SESSION_SCHEMA {
        return Err(SessionError::UnsupportedSchema(schema));
    }
    let SessionRecord::V1(session) = serde_json::from_value(value)?;
    session.validate()?;
    Ok(session)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyProfile {
    id: Option<String>,
    team_a: Option<String>,
    team_b: Option<String>,
    profile_text: Option<String>,
    #[serde(default)]
    sources: Vec<serde_json::Value>,
    created_at: Option<LegacyTimestamp>,
    #[serde(default)]
    inputs: ProfileInputs,
}

#[derive(Debug, Deserialize)]
struct LegacyTimestamp {
    seconds: i64,
}

impl LegacyProfile {
    fn into_session(self) -> Result<SavedSession, SessionError> {
        let sources = self
            .sources
            .iter()
            .filter_map(|s| {
                let uri = s.get("uri")?.as_str()?.to_string();
                let title = s.get("title")?.as_str()?.to_string();
                (!uri.is_empty() && !title.is_empty()).then_some(Source { uri, title })
            })
            .collect();
        let mut inputs = self.inputs;
        let team_a = self.team_a.unwrap_or_default();
        let team_b = self.team_b.unwrap_or_default();
        if inputs.team_a.is_empty() {
            inputs.team_a = team_a.clone();
        }
        if inputs.team_b.is_empty() {
            inputs.team_b = team_b.clone();
        }
        let session = SavedSession {
            id: self
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            team_a,
            team_b,
            profile_text: self.profile_text.unwrap_or_default(),
            sources,
            created_at: self.created_at.map(|t| t.seconds).unwrap_or_default(),
            inputs,
        };
        session.validate()?;
        Ok(session)
    }
}

/// A saved-profiles export from the browser build: a JSON array of profiles. One invalid
/// entry rejects the whole file.
pub fn parse_legacy_export(raw: &str) -> Result<Vec<SavedSession>, SessionError> {
    let profiles: Vec<LegacyProfile> = serde_json::from_str(raw)?;
    profiles.into_iter().map(LegacyProfile::into_session).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub id: String,
    pub team_a: String,
    pub team_b: String,
    pub created_at: i64,
}

pub fn default_db_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join("sessions.sqlite"))
}

pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn = Connection::open(path)
            .with_context(|| format!("open sqlite db {}", path.display()))?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory sqlite db")?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Inserts, or replaces a session with the same id.
    pub fn save(&self, session: &SavedSession) -> Result<()> {
        session.validate()?;
        let record = encode_record(session)?;
        self.conn
            .execute(
                r#"
                INSERT INTO sessions (id, team_a, team_b, created_at, record)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(id) DO UPDATE SET
                    team_a = excluded.team_a,
                    team_b = excluded.team_b,
                    created_at = excluded.created_at,
                    record = excluded.record
                "#,
                params![
                    session.id,
                    session.team_a,
                    session.team_b,
                    session.created_at,
                    record
                ],
            )
            .with_context(|| format!("save session {}", session.id))?;
        Ok(())
    }

    /// Newest first.
    pub fn list(&self) -> Result<Vec<SessionSummary>> {
        let mut stmt = self
            .conn
            .prepare(
                r#"
                SELECT id, team_a, team_b, created_at
                FROM sessions
                ORDER BY created_at DESC, id ASC
                "#,
            )
            .context("prepare list sessions query")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(SessionSummary {
                    id: row.get(0)?,
                    team_a: row.get(1)?,
                    team_b: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })
            .context("query sessions")?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("decode session row")?);
        }
        Ok(out)
    }

    pub fn get(&self, id: &str) -> Result<Option<SavedSession>> {
        let record: Option<String> = self
            .conn
            .query_row(
                "SELECT record FROM sessions WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("load session {id}"))?;
        match record {
            Some(raw) => {
                let session =
                    decode_record(&raw).with_context(|| format!("decode session {id}"))?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    /// `false` when no session had that id.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM sessions WHERE id = ?1", params![id])
            .with_context(|| format!("delete session {id}"))?;
        Ok(removed > 0)
    }

    pub fn import_legacy(&self, raw: &str) -> Result<usize> {
        let sessions = parse_legacy_export(raw).context("invalid legacy profiles export")?;
        for session in &sessions {
            self.save(session)?;
        }
        Ok(sessions.len())
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            team_a TEXT NOT NULL,
            team_b TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            record TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS sessions_created_at ON sessions (created_at DESC);
        "#,
    )
    .context("init sessions schema")?;
    Ok(())
}
