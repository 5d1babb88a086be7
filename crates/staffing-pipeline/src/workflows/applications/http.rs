use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::actions::ApplicationActionData;
use super::domain::{ActorRole, Application, ApplicationId, ApplicationPage, Pagination};
use super::filters::ApplicationListQuery;
use super::gateway::{ApplicationGateway, GatewayError, StatusMappingSource};
use super::mapping::StatusMappingPayload;
use crate::config::BackendConfig;

pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Longest backend error body echoed into error messages.
const MAX_ERROR_BODY_LENGTH: usize = 200;

/// `{ success, data, message, pagination }` wrapper used by every endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default = "Option::default")]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

/// Marketplace REST backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    api_token: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, GatewayError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|err| GatewayError::Transport(format!("invalid backend url: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Transport(format!(
                "invalid backend url: {}",
                config.base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            api_token: config.api_token.clone(),
        })
    }

    /// Appends each segment percent-encoded, so ids cannot add path levels or a query.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        if let Some(bad) = segments
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(GatewayError::Rejected {
                message: format!("'{bad}' is not a valid path segment"),
            });
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::Transport("backend url cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, role: Option<ActorRole>) -> RequestBuilder {
        debug!(%method, %url, "backend request");

        let mut request = self.client.request(method, url);
        if let Some(token) = &self.api_token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(role) = role {
            request = request.header(ACTOR_ROLE_HEADER, role.label());
        }
        request
    }

    async fn send<T>(&self, request: RequestBuilder) -> Result<Envelope<T>, GatewayError>
    where
        T: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        let response = error_for_status(response).await?;
        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|err| GatewayError::Decode(err.to_string()))?;

        if !envelope.success {
            return Err(GatewayError::Rejected {
                message: envelope
                    .message
                    .unwrap_or_else(|| "request was not successful".to_string()),
            });
        }
        Ok(envelope)
    }
}

async fn error_for_status(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(|message| message.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| truncate(&body));

    Err(GatewayError::Status {
        code: status.as_u16(),
        message,
    })
}

fn truncate(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated)", &body[..end])
}

#[async_trait]
impl StatusMappingSource for HttpBackend {
    async fn fetch_status_mapping(&self) -> Result<StatusMappingPayload, GatewayError> {
        let url = self.endpoint(&["applications", "status-mapping"])?;
        let request = self.request(Method::GET, url, None);
        self.send::<StatusMappingPayload>(request)
            .await?
            .data
            .ok_or_else(|| GatewayError::Decode("status mapping response has no data".to_string()))
    }
}

#[async_trait]
impl ApplicationGateway for HttpBackend {
    async fn update_status(
        &self,
        role: ActorRole,
        application_id: &ApplicationId,
        action: &ApplicationActionData,
    ) -> Result<serde_json::Value, GatewayError> {
        let url = self.endpoint(&["applications", &application_id.0, "status"])?;
        let request = self.request(Method::PUT, url, Some(role)).json(action);
        let envelope = self.send::<serde_json::Value>(request).await?;
        Ok(envelope.data.unwrap_or(serde_json::Value::Null))
    }

    async fn list_applications(
        &self,
        role: ActorRole,
        query: &ApplicationListQuery,
    ) -> Result<ApplicationPage, GatewayError> {
        let url = self.endpoint(&["applications", role.list_segment()])?;
        let request = self
            .request(Method::GET, url, Some(role))
            .query(&query.query_pairs());
        let envelope = self.send::<Vec<Application>>(request).await?;

        let items = envelope.data.unwrap_or_default();
        let pagination = envelope
            .pagination
            .unwrap_or_else(|| Pagination::new(query.page, query.limit, items.len() as u64));
        Ok(ApplicationPage { items, pagination })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base_url: &str) -> HttpBackend {
        HttpBackend::new(&BackendConfig::new(base_url)).expect("client builds")
    }

    #[test]
    fn endpoint_appends_to_base_path_with_or_without_trailing_slash() {
        for base in ["http://127.0.0.1:3000/api", "http://127.0.0.1:3000/api/"] {
            let url = backend(base)
                .endpoint(&["applications", "status-mapping"])
                .expect("valid endpoint");
            assert_eq!(
                url.as_str(),
                "http://127.0.0.1:3000/api/applications/status-mapping"
            );
        }
    }

    #[test]
    fn endpoint_escapes_application_ids() {
        let url = backend("http://127.0.0.1:3000/api")
            .endpoint(&["applications", "app/1?force=true#x", "status"])
            .expect("valid endpoint");
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:3000/api/applications/app%2F1%3Fforce=true%23x/status"
        );
        assert!(url.query().is_none());
    }

    #[test]
    fn endpoint_refuses_dot_segments() {
        let backend = backend("http://127.0.0.1:3000/api");
        for id in ["..", ".", ""] {
            let error = backend
                .endpoint(&["applications", id, "status"])
                .expect_err("dot segment refused");
            assert!(matches!(error, GatewayError::Rejected { .. }), "{id:?}");
        }
    }

    #[test]
    fn invalid_base_url_fails_construction() {
        let error = HttpBackend::new(&BackendConfig::new("not a url")).expect_err("rejected");
        assert!(matches!(error, GatewayError::Transport(_)));
    }

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate("not found"), "not found");
    }

    #[test]
    fn truncate_cuts_long_bodies_on_char_boundary() {
        let body = "é".repeat(150);
        let truncated = truncate(&body);
        assert!(truncated.ends_with("... (truncated)"));
        assert!(truncated.len() < body.len());
    }

    #[test]
    fn envelope_tolerates_missing_data() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"success":false,"message":"nope"}"#).expect("decodes");
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message.as_deref(), Some("nope"));
    }
}
