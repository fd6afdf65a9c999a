use anyhow::Result;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::db::Database;

pub const DEFAULT_LOG_LIMIT: u32 = 50;
pub const MAX_LOG_LIMIT: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    ShortenLink,
    ShortenLinkResponse,
    BulkShortenLink,
    BulkShortenLinkResponse,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::ShortenLink => "shorten_link",
            RequestType::ShortenLinkResponse => "shorten_link_response",
            RequestType::BulkShortenLink => "bulk_shorten_link",
            RequestType::BulkShortenLinkResponse => "bulk_shorten_link_response",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiLog {
    pub id: i32,
    pub user_id: String,
    pub request_type: String,
    pub request_data: JsonValue,
    pub response_data: Option<JsonValue>,
    pub status_code: Option<i32>,
    pub error_message: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewApiLog {
    pub request_type: RequestType,
    pub request_data: JsonValue,
    pub response_data: Option<JsonValue>,
    pub status_code: Option<u16>,
    pub error_message: Option<String>,
}

impl NewApiLog {
    pub fn request(request_type: RequestType, request_data: JsonValue) -> Self {
        NewApiLog {
            request_type,
            request_data,
            response_data: None,
            status_code: None,
            error_message: None,
        }
    }
}

pub struct ApiLogStore<'a> {
    db: &'a Database,
}

impl<'a> ApiLogStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn insert(&self, user_id: &str, entry: NewApiLog) -> Result<()> {
        let query = r#"
            INSERT INTO api_logs (user_id, request_type, request_data, response_data, status_code, error_message)
            VALUES (?, ?, ?, ?, ?, ?)
        "#;

        let response_data = entry.response_data.map(|v| v.to_string());
        let status_code = entry.status_code.map(i64::from);

        self.db
            .execute(
                query,
                libsql::params![
                    user_id,
                    entry.request_type.as_str(),
                    entry.request_data.to_string(),
                    response_data,
                    status_code,
                    entry.error_message
                ],
            )
            .await?;
        Ok(())
    }

    /// The user's entries, newest first. `limit` defaults to 50 and is capped at 200.
    pub async fn list_recent(&self, user_id: &str, limit: Option<u32>) -> Result<Vec<ApiLog>> {
        let limit = limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT);
        let query = r#"
            SELECT id, user_id, request_type, request_data, response_data, status_code, error_message, created_at
            FROM api_logs
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
        "#;

        let mut rows = self
            .db
            .connection()
            .query(query, libsql::params![user_id, limit as i64])
            .await?;

        let mut logs = Vec::new();
        while let Some(row) = rows.next().await? {
            let request_data: String = row.get(3)?;
            let response_data: Option<String> = row.get(4)?;
            logs.push(ApiLog {
                id: row.get(0)?,
                user_id: row.get(1)?,
                request_type: row.get(2)?,
                request_data: parse_stored_json(request_data),
                response_data: response_data.map(parse_stored_json),
                status_code: row.get(5)?,
                error_message: row.get(6)?,
                created_at: row.get(7)?,
            });
        }
        Ok(logs)
    }
}

fn parse_stored_json(raw: String) -> JsonValue {
    serde_json::from_str(&raw).unwrap_or(JsonValue::String(raw))
}
