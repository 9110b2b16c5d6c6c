//! Analysis service client
//!
//! HTTP access to the remote analysis service behind the [`AnalysisService`]
//! trait. The controller and chat lifecycle only ever see the trait, which
//! keeps them testable without a network.

use std::collections::HashMap;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use repolens_core::{ErrorContext, LensError, LensResult, DEFAULT_SERVICE_URL};

use crate::chat::ChatMessage;
use crate::raw::RawAnalysis;

/// Configuration for the analysis service client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL of the analysis service
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
    /// Additional headers
    pub headers: HashMap<String, String>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVICE_URL.to_string(),
            timeout_seconds: 30,
            user_agent: "repolens/0.1".to_string(),
            headers: HashMap::new(),
        }
    }
}

impl ApiClientConfig {
    /// Create a configuration pointing at the given service base URL
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set additional header
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }
}

/// Body of `POST /api/analyze`
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest {
    pub github_url: String,
}

/// Body of `POST /api/chat`
#[derive(Debug, Serialize)]
struct ChatTurnRequest<'a> {
    messages: &'a [ChatMessage],
}

/// Successful body of `POST /api/chat`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// Body of `GET /api/health`
#[derive(Debug, Deserialize)]
struct HealthReply {
    status: String,
}

/// The remote analysis service as the client consumes it
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Run a full analysis of the repository at `github_url`
    async fn analyze(&self, github_url: &str) -> LensResult<RawAnalysis>;

    /// One chat round trip carrying the whole session so far
    async fn chat(&self, messages: &[ChatMessage]) -> LensResult<ChatReply>;

    /// Reachability probe; unreachable is `false`, never an error
    async fn health(&self) -> LensResult<bool>;
}

/// HTTP implementation of [`AnalysisService`]
pub struct HttpAnalysisService {
    client: reqwest::Client,
    config: ApiClientConfig,
}

impl HttpAnalysisService {
    /// Create a new service client
    pub fn new(config: ApiClientConfig) -> LensResult<Self> {
        let client = create_http_client(&config)?;

        info!("Created analysis service client for {}", config.base_url);

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        operation: &str,
    ) -> LensResult<reqwest::Response> {
        let url = self.endpoint(path);

        debug!("Making analysis service request to: {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| LensError::Network {
                message: format!("Failed to reach analysis service: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("api_client").with_operation(operation),
            })?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, operation).await);
        }

        Ok(response)
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn analyze(&self, github_url: &str) -> LensResult<RawAnalysis> {
        info!("Requesting analysis for {}", github_url);

        let body = AnalyzeRequest {
            github_url: github_url.to_string(),
        };
        let response = self.post_json("api/analyze", &body, "analyze").await?;

        let raw: RawAnalysis = response.json().await.map_err(|e| LensError::Service {
            message: format!("Analysis response body was not valid JSON: {}", e),
            status: None,
            source: Some(Box::new(e)),
            context: ErrorContext::new("api_client").with_operation("analyze"),
        })?;

        ensure_service_success(raw)
    }

    async fn chat(&self, messages: &[ChatMessage]) -> LensResult<ChatReply> {
        debug!("Sending chat round trip with {} messages", messages.len());

        let body = ChatTurnRequest { messages };
        let response = self.post_json("api/chat", &body, "chat").await?;

        response.json().await.map_err(|e| LensError::Service {
            message: format!("Chat response body was not valid JSON: {}", e),
            status: None,
            source: Some(Box::new(e)),
            context: ErrorContext::new("api_client").with_operation("chat"),
        })
    }

    async fn health(&self) -> LensResult<bool> {
        let url = self.endpoint("api/health");

        let response = match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!("Health check returned HTTP {}", response.status());
                return Ok(false);
            }
            Err(e) => {
                debug!("Health check failed: {}", e);
                return Ok(false);
            }
        };

        match response.json::<HealthReply>().await {
            Ok(reply) => Ok(reply.status == "healthy"),
            Err(_) => Ok(false),
        }
    }
}

/// Reject bodies carrying the service's error envelope: the service reports
/// some failures as HTTP 200 with `{"status": "error", "message": ...}`
pub(crate) fn ensure_service_success(raw: RawAnalysis) -> LensResult<RawAnalysis> {
    if raw.is_error_envelope() {
        let message = raw
            .message
            .unwrap_or_else(|| "the service reported an unspecified error".to_string());
        warn!("Analysis service returned an error envelope: {}", message);

        return Err(LensError::Service {
            message,
            status: None,
            source: None,
            context: ErrorContext::new("api_client")
                .with_operation("analyze")
                .with_suggestion("Check that the repository is public and the URL is correct"),
        });
    }

    Ok(raw)
}

/// Helper function to create HTTP client with common configuration
pub(crate) fn create_http_client(config: &ApiClientConfig) -> LensResult<reqwest::Client> {
    let mut headers = reqwest::header::HeaderMap::new();

    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_str(&config.user_agent).map_err(|e| {
            LensError::Config {
                message: format!("Invalid user agent: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_client").with_operation("create_client"),
            }
        })?,
    );

    for (key, value) in &config.headers {
        let header_name = reqwest::header::HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            LensError::Config {
                message: format!("Invalid header name '{}': {}", key, e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_client").with_operation("create_client"),
            }
        })?;

        let header_value =
            reqwest::header::HeaderValue::from_str(value).map_err(|e| LensError::Config {
                message: format!("Invalid header value for '{}': {}", key, e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_client").with_operation("create_client"),
            })?;

        headers.insert(header_name, header_value);
    }

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .default_headers(headers)
        .build()
        .map_err(|e| LensError::Network {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("http_client").with_operation("create_client"),
        })?;

    Ok(client)
}

/// Helper function to handle HTTP response errors
pub(crate) async fn handle_response_error(
    response: reqwest::Response,
    operation: &str,
) -> LensError {
    let status = response.status();
    let url = response.url().clone();

    let error_body = response.text().await.unwrap_or_default();

    LensError::Service {
        message: format!(
            "HTTP {} error for {}: {}",
            status.as_u16(),
            url,
            if error_body.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error")
            } else {
                &error_body
            }
        ),
        status: Some(status.as_u16()),
        source: None,
        context: ErrorContext::new("api_client")
            .with_operation(operation)
            .with_suggestion(match status.as_u16() {
                404 => "Check that the repository exists and is public",
                429 => "The service is rate limited, try again shortly",
                500..=599 => "The analysis service had an internal problem",
                _ => "Check the service base URL and network connectivity",
            }),
    }
}
