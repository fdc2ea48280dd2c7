//! Executes `HttpRequest` values against the network.
//!
//! The sync controller and auth flow only see the [`Transport`] trait, so
//! tests can substitute a scripted implementation while production code
//! uses [`ReqwestTransport`]. A non-2xx status is still `Ok` here; status
//! interpretation belongs to `TodoClient::parse_*`.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round trip.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_reqwest(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = %request.method, url = %request.path, "Sending request");

        let mut builder = self.client.request(to_reqwest(request.method), request.path.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(url = %request.path, error = %e, "Request failed before a response");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        tracing::debug!(status, url = %request.path, "Received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn execute_forwards_method_headers_and_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/todos"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({ "title": "Buy milk" })))
            .respond_with(
                ResponseTemplate::new(201).set_body_string(r#"{"id":1,"title":"Buy milk","completed":false}"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let request = HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/todos", mock_server.uri()),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(r#"{"title":"Buy milk"}"#.to_string()),
        };
        let response = ReqwestTransport::new().execute(request).await.unwrap();
        assert_eq!(response.status, 201);
        assert!(response.body.contains("Buy milk"));
    }

    #[tokio::test]
    async fn execute_returns_error_statuses_as_data() {
        let mock_server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let request = HttpRequest {
            method: HttpMethod::Patch,
            path: format!("{}/todos/1/toggle", mock_server.uri()),
            headers: Vec::new(),
            body: None,
        };
        let response = ReqwestTransport::new().execute(request).await.unwrap();
        assert_eq!(response.status, 500);
        assert_eq!(response.body, "boom");
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn execute_reports_connection_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let request = HttpRequest {
            method: HttpMethod::Get,
            path: format!("http://{addr}/todos"),
            headers: Vec::new(),
            body: None,
        };
        let err = ReqwestTransport::new().execute(request).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
