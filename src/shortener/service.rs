use std::time::Duration;

use serde::Serialize;

use super::audit::{ApiLogStore, NewApiLog, RequestType};
use super::client::{CreateLinkRequest, RebrandlyClient};
use crate::db::Database;
use crate::error::ShortenError;
use crate::handler::AppState;
use crate::links::LinkStore;
use crate::model::ShorteningStatus;
use crate::settings::SettingsStore;

#[derive(Debug, Clone, Serialize)]
pub struct ShortenedLink {
    pub success: bool,
    pub short_url: String,
    pub rebrandly_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkResult {
    pub link_id: i32,
    pub status: ShorteningStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkSummary {
    pub success: bool,
    pub processed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub successful: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<usize>,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<LinkResult>,
}

impl BulkSummary {
    fn nothing_to_do() -> Self {
        BulkSummary {
            success: true,
            processed: 0,
            successful: None,
            errors: None,
            message: "No links need shortening (already shortened or not found)".to_string(),
            results: vec![],
        }
    }

    fn from_results(results: Vec<LinkResult>) -> Self {
        let processed = results.len();
        let successful = results
            .iter()
            .filter(|r| r.status == ShorteningStatus::Shortened)
            .count();
        let errors = processed - successful;

        BulkSummary {
            success: true,
            processed,
            successful: Some(successful),
            errors: Some(errors),
            message: format!(
                "Processed {} links: {} successful, {} errors",
                processed, successful, errors
            ),
            results,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Single,
    Bulk,
}

impl Mode {
    fn request_types(self) -> (RequestType, RequestType) {
        match self {
            Mode::Single => (RequestType::ShortenLink, RequestType::ShortenLinkResponse),
            Mode::Bulk => (RequestType::BulkShortenLink, RequestType::BulkShortenLinkResponse),
        }
    }
}

/// Drives Rebrandly calls for one user's links and keeps link status and
/// the audit log in step with every call.
pub struct Shortener<'a> {
    db: &'a Database,
    client: &'a RebrandlyClient,
    interval: Duration,
}

impl<'a> Shortener<'a> {
    pub fn new(db: &'a Database, client: &'a RebrandlyClient, interval: Duration) -> Self {
        Self { db, client, interval }
    }

    pub fn from_state(state: &'a AppState) -> Self {
        Self::new(&state.db, &state.rebrandly, state.request_interval)
    }

    pub async fn shorten_link(
        &self,
        user_id: &str,
        link_id: i32,
        destination: Option<String>,
    ) -> Result<ShortenedLink, ShortenError> {
        let settings = SettingsStore::new(self.db).get_or_create(user_id).await?;
        let api_key = settings.api_key().ok_or(ShortenError::MissingApiKey)?;

        let links = LinkStore::new(self.db);
        let link = links
            .get(user_id, link_id)
            .await?
            .ok_or(ShortenError::LinkNotFound)?;

        let destination = destination
            .as_deref()
            .and_then(crate::metadata::normalize_url)
            .unwrap_or(link.url);

        links.set_status(user_id, &[link_id], ShorteningStatus::Pending).await?;

        let request = CreateLinkRequest::new(&destination, settings.custom_domain());
        let result = self.call(user_id, api_key, link_id, &request, Mode::Single).await;

        if let Err(e) = &result {
            tracing::warn!(link_id, error = %e, "failed to shorten link");
            self.mark_failed(user_id, link_id).await;
        }
        result
    }

    /// Shortens every listed link that has no short URL yet, one at a time
    /// and in request order, pausing between upstream calls.
    pub async fn shorten_links(&self, user_id: &str, link_ids: &[i32]) -> Result<BulkSummary, ShortenError> {
        let mut ids: Vec<i32> = Vec::with_capacity(link_ids.len());
        for id in link_ids {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }
        if ids.is_empty() {
            return Err(ShortenError::EmptyBatch);
        }

        let settings = SettingsStore::new(self.db).get_or_create(user_id).await?;
        let api_key = settings.api_key().ok_or(ShortenError::MissingApiKey)?;

        let links = LinkStore::new(self.db);
        let pending = links.find_unshortened(user_id, &ids).await?;
        if pending.is_empty() {
            return Ok(BulkSummary::nothing_to_do());
        }

        let pending_ids: Vec<i32> = pending.iter().map(|l| l.id).collect();
        links.set_status(user_id, &pending_ids, ShorteningStatus::Pending).await?;
        tracing::info!(user = %user_id, count = pending.len(), "bulk shortening started");

        let mut results = Vec::with_capacity(pending.len());
        for (i, link) in pending.iter().enumerate() {
            if i > 0 && !self.interval.is_zero() {
                tokio::time::sleep(self.interval).await;
            }

            let request = CreateLinkRequest::new(&link.url, settings.custom_domain());
            let result = match self.call(user_id, api_key, link.id, &request, Mode::Bulk).await {
                Ok(shortened) => LinkResult {
                    link_id: link.id,
                    status: ShorteningStatus::Shortened,
                    short_url: Some(shortened.short_url),
                    error: None,
                },
                Err(e) => {
                    tracing::warn!(link_id = link.id, error = %e, "failed to shorten link");
                    self.mark_failed(user_id, link.id).await;
                    LinkResult {
                        link_id: link.id,
                        status: ShorteningStatus::Error,
                        short_url: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            results.push(result);
        }

        let summary = BulkSummary::from_results(results);
        tracing::info!(user = %user_id, "{}", summary.message);
        Ok(summary)
    }

    /// One upstream call bracketed by its request and response audit entries.
    async fn call(
        &self,
        user_id: &str,
        api_key: &str,
        link_id: i32,
        request: &CreateLinkRequest,
        mode: Mode,
    ) -> Result<ShortenedLink, ShortenError> {
        let audit = ApiLogStore::new(self.db);
        let (request_type, response_type) = mode.request_types();
        let request_data = request.audit_data(match mode {
            Mode::Single => None,
            Mode::Bulk => Some(link_id),
        });

        audit
            .insert(user_id, NewApiLog::request(request_type, request_data.clone()))
            .await?;

        let response = match self.client.create_link(api_key, request).await {
            Ok(response) => response,
            Err(e) => {
                audit
                    .insert(
                        user_id,
                        NewApiLog {
                            error_message: Some(e.to_string()),
                            ..NewApiLog::request(response_type, request_data)
                        },
                    )
                    .await?;
                return Err(e.into());
            }
        };

        audit
            .insert(
                user_id,
                NewApiLog {
                    request_type: response_type,
                    request_data,
                    response_data: Some(response.body.clone()),
                    status_code: Some(response.status),
                    error_message: (!response.is_success()).then(|| response.status_line()),
                },
            )
            .await?;

        match response.created_link() {
            Some((short_url, rebrandly_id)) if response.is_success() => {
                LinkStore::new(self.db)
                    .record_short_url(user_id, link_id, &short_url, &rebrandly_id)
                    .await?;
                Ok(ShortenedLink {
                    success: true,
                    short_url,
                    rebrandly_id,
                })
            }
            _ => Err(ShortenError::Upstream {
                status: response.status,
                details: response.body,
            }),
        }
    }

    async fn mark_failed(&self, user_id: &str, link_id: i32) {
        if let Err(e) = LinkStore::new(self.db)
            .set_status(user_id, &[link_id], ShorteningStatus::Error)
            .await
        {
            tracing::error!(link_id, "failed to mark link as errored: {}", e);
        }
    }
}
