use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{Value as JsonValue, json};

use crate::error::RebrandlyError;

#[derive(Debug, Clone, Serialize)]
pub struct DomainRef {
    #[serde(rename = "fullName")]
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateLinkRequest {
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<DomainRef>,
}

impl CreateLinkRequest {
    pub fn new(destination: &str, custom_domain: Option<&str>) -> Self {
        CreateLinkRequest {
            destination: destination.to_string(),
            domain: custom_domain
                .filter(|d| !d.trim().is_empty())
                .map(|d| DomainRef {
                    full_name: d.trim().to_string(),
                }),
        }
    }

    /// The request as written to the audit log; bulk runs add the link id.
    pub fn audit_data(&self, link_id: Option<i32>) -> JsonValue {
        let mut data = json!({ "destination": self.destination });
        if let Some(domain) = &self.domain {
            data["domain"] = json!({ "fullName": domain.full_name });
        }
        if let Some(id) = link_id {
            data["linkId"] = json!(id);
        }
        data
    }
}

/// An answer from Rebrandly, whatever its status.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: JsonValue,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `HTTP 404`, the audit-log form of a non-2xx answer.
    pub fn status_line(&self) -> String {
        format!("HTTP {}", self.status)
    }

    pub fn reason(&self) -> &'static str {
        StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("")
    }

    /// `(short_url, id)` of a created link. Missing when the body lacks either.
    pub fn created_link(&self) -> Option<(String, String)> {
        let short_url = self.body.get("shortUrl")?.as_str()?;
        let id = self.body.get("id")?.as_str()?;
        Some((short_url.to_string(), id.to_string()))
    }
}

pub struct RebrandlyClient {
    http: reqwest::Client,
    base_url: String,
}

impl RebrandlyClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RebrandlyError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if url::Url::parse(base_url).is_err() {
            return Err(RebrandlyError::BaseUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RebrandlyError::Client)?;

        Ok(RebrandlyClient {
            http,
            base_url: base_url.to_string(),
        })
    }

    pub async fn create_link(
        &self,
        api_key: &str,
        request: &CreateLinkRequest,
    ) -> Result<UpstreamResponse, RebrandlyError> {
        let endpoint = format!("{}/v1/links", self.base_url);
        tracing::debug!(destination = %request.destination, "creating rebrandly link");

        let response = self
            .http
            .post(&endpoint)
            .header("apikey", api_key)
            .json(request)
            .send()
            .await
            .map_err(|source| RebrandlyError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        read_response(endpoint, response).await
    }

    pub async fn account(&self, api_key: &str) -> Result<UpstreamResponse, RebrandlyError> {
        let endpoint = format!("{}/v1/account", self.base_url);

        let response = self
            .http
            .get(&endpoint)
            .header("apikey", api_key)
            .send()
            .await
            .map_err(|source| RebrandlyError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        read_response(endpoint, response).await
    }
}

async fn read_response(endpoint: String, response: reqwest::Response) -> Result<UpstreamResponse, RebrandlyError> {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|source| RebrandlyError::Transport { endpoint, source })?;

    let body = if text.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_str(&text).unwrap_or(JsonValue::String(text))
    };

    Ok(UpstreamResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> RebrandlyClient {
        RebrandlyClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_domain_is_omitted_without_custom_domain() {
        let body = serde_json::to_value(CreateLinkRequest::new("https://a.dev", None)).unwrap();
        assert_eq!(body, json!({"destination": "https://a.dev"}));

        let body = serde_json::to_value(CreateLinkRequest::new("https://a.dev", Some("  "))).unwrap();
        assert_eq!(body, json!({"destination": "https://a.dev"}));

        let body = serde_json::to_value(CreateLinkRequest::new("https://a.dev", Some("go.me"))).unwrap();
        assert_eq!(body, json!({"destination": "https://a.dev", "domain": {"fullName": "go.me"}}));
    }

    #[test]
    fn test_audit_data_carries_link_id() {
        let request = CreateLinkRequest::new("https://a.dev", Some("go.me"));
        assert_eq!(
            request.audit_data(Some(7)),
            json!({"destination": "https://a.dev", "domain": {"fullName": "go.me"}, "linkId": 7})
        );
        assert_eq!(request.audit_data(None).get("linkId"), None);
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            RebrandlyClient::new("not a url", Duration::from_secs(1)),
            Err(RebrandlyError::BaseUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_create_link_sends_key_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/links"))
            .and(header("apikey", "secret"))
            .and(body_json(json!({"destination": "https://a.dev/x"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "abc123",
                "shortUrl": "rebrand.ly/x1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client(&server)
            .create_link("secret", &CreateLinkRequest::new("https://a.dev/x", None))
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(
            response.created_link(),
            Some(("rebrand.ly/x1".to_string(), "abc123".to_string()))
        );
    }

    #[tokio::test]
    async fn test_non_json_error_body_is_kept_as_string() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/account"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let response = client(&server).account("bad").await.unwrap();

        assert!(!response.is_success());
        assert_eq!(response.status_line(), "HTTP 401");
        assert_eq!(response.reason(), "Unauthorized");
        assert_eq!(response.body, JsonValue::String("Unauthorized".to_string()));
        assert_eq!(response.created_link(), None);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_transport_error() {
        let server = MockServer::builder().start().await;
        let uri = server.uri();
        drop(server);

        let client = RebrandlyClient::new(&uri, Duration::from_secs(1)).unwrap();
        let err = client.account("key").await.unwrap_err();
        assert!(matches!(err, RebrandlyError::Transport { .. }));
    }
}
