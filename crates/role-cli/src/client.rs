//! API client for communicating with the role service

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use role_core::{HealthStatus, PredictRequest, PredictionResult};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

/// API client for the role service
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        Self::parse(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| format!("{}: {}", e.error.code, e.error.message))
                .unwrap_or(body);
            anyhow::bail!("API error ({}): {}", status, message);
        }

        response.json().await.context("Failed to parse response")
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.get("health").await
    }

    pub async fn predict(&self, text: &str) -> Result<PredictionResult> {
        self.post("predict", &PredictRequest::new(text)).await
    }
}

/// Error body returned by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_parses_camel_case() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/health")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"status":"ok","vectorizer":true,"classifier":false,"labelDecoder":true}"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let health = client.health().await.unwrap();

        mock.assert_async().await;
        assert_eq!(health.status, "ok");
        assert!(health.vectorizer);
        assert!(!health.classifier);
        assert!(health.label_decoder);
    }

    #[tokio::test]
    async fn test_predict_sends_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/predict")
            .match_body(mockito::Matcher::Json(serde_json::json!({"text": "aws lambda"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"role":"DevOps Engineer","confidence":null}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let result = client.predict("aws lambda").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result, PredictionResult::new("DevOps Engineer", None));
    }

    #[tokio::test]
    async fn test_service_error_message_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/predict")
            .with_status(503)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"error":{"code":"SERVICE_UNAVAILABLE","message":"Artifacts not loaded."}}"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client.predict("react").await.unwrap_err().to_string();

        assert!(err.contains("503"));
        assert!(err.contains("SERVICE_UNAVAILABLE: Artifacts not loaded."));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ApiClient::new("not a url").is_err());
    }
}
