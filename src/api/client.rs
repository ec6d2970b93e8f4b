//! HTTP implementation of [`HealthApi`]

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::{
    endpoints,
    errors::{plain_text_message, ApiError, ApiResult},
    types::{PatientIdsResponse, SendOtpRequest, ServerReply, VerifyOtpRequest},
    HealthApi,
};
use crate::config::Config;

/// reqwest-backed client for the health backend
#[derive(Debug, Clone)]
pub struct HttpHealthApi {
    client: Client,
    base_url: String,
}

impl HttpHealthApi {
    /// Create a new client from configuration
    pub fn new(config: &Config) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base().to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    async fn post_json<B: Serialize + ?Sized + Sync>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResult<ServerReply> {
        let url = self.url(endpoint);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let text = Self::checked_body(response).await?;
        if text.trim().is_empty() {
            return Ok(ServerReply::default());
        }

        // Some endpoints answer with plain text on success
        Ok(serde_json::from_str(&text).unwrap_or_else(|_| ServerReply {
            message: plain_text_message(&text),
            token: None,
        }))
    }

    async fn checked_body(response: Response) -> ApiResult<String> {
        let status = response.status();
        let text = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            warn!("Backend returned {}: {}", status, text);
            return Err(ApiError::from_response(status.as_u16(), &text));
        }

        Ok(text)
    }
}

fn map_transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::TimeoutError(e.to_string())
    } else {
        ApiError::HttpError(e)
    }
}

#[async_trait]
impl HealthApi for HttpHealthApi {
    async fn send_otp(&self, phone: &str) -> ApiResult<ServerReply> {
        self.post_json(endpoints::SEND_OTP, &SendOtpRequest { phone }).await
    }

    async fn verify_otp(&self, phone: &str, otp: &str) -> ApiResult<ServerReply> {
        self.post_json(endpoints::VERIFY_OTP, &VerifyOtpRequest { phone, otp })
            .await
    }

    async fn fetch_patient_ids(&self) -> ApiResult<Vec<String>> {
        let url = self.url(endpoints::PATIENT_IDS);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_transport_error)?;

        let text = Self::checked_body(response).await?;
        let ids: PatientIdsResponse = serde_json::from_str(&text)?;
        Ok(ids.into_ids())
    }

    async fn submit(&self, endpoint: &str, payload: &Value) -> ApiResult<ServerReply> {
        self.post_json(endpoint, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let mut config = Config::default();
        config.base_url = "https://health.example.org/api/".to_string();
        let api = HttpHealthApi::new(&config).unwrap();

        assert_eq!(api.url("/patients"), "https://health.example.org/api/patients");
        assert_eq!(api.url("water-intake"), "https://health.example.org/api/water-intake");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let mut config = Config::default();
        // Port 9 (discard) on localhost is closed on typical machines
        config.base_url = "http://127.0.0.1:9".to_string();
        config.timeout_secs = 2;
        let api = HttpHealthApi::new(&config).unwrap();

        let err = api.fetch_patient_ids().await.unwrap_err();
        assert!(matches!(err, ApiError::HttpError(_) | ApiError::TimeoutError(_)));
        assert_eq!(err.server_message(), None);
    }
}
