//! Remote journey service seam and its HTTP implementation.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    error::ApiException,
    protocol::{
        JourneyCancelRequest, JourneyCancelResponse, JourneyFeedbackRequest,
        JourneyFeedbackResponse, JourneyResumeRequest, JourneyStartRequest, JourneyStartResponse,
        JourneySubmitAnswersRequest, JourneySubmitAnswersResponse,
    },
};
use tracing::debug;
use url::Url;

use crate::config::ClientSettings;

/// Calls are at-most-once: implementations must not retry on their own.
#[async_trait]
pub trait JourneyService: Send + Sync {
    async fn start(&self, request: JourneyStartRequest) -> Result<JourneyStartResponse>;
    async fn resume(&self, request: JourneyResumeRequest) -> Result<JourneyStartResponse>;
    async fn submit_answers(
        &self,
        request: JourneySubmitAnswersRequest,
    ) -> Result<JourneySubmitAnswersResponse>;
    async fn submit_feedback(
        &self,
        request: JourneyFeedbackRequest,
    ) -> Result<JourneyFeedbackResponse>;
    async fn cancel(&self, request: JourneyCancelRequest) -> Result<JourneyCancelResponse>;
}

pub struct HttpJourneyService {
    http: Client,
    base_url: Url,
}

impl HttpJourneyService {
    pub fn new(server_url: &str, api_prefix: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build journey http client")?;
        Ok(Self {
            http,
            base_url: api_base_url(server_url, api_prefix)?,
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        Self::new(
            &settings.server_url,
            &settings.api_prefix,
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("invalid journey endpoint path '{path}'"))?;
        debug!(%url, "journey: POST");

        let res = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .with_context(|| format!("failed to reach journey service at {url}"))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(anyhow::Error::new(ApiException::from_body(status.as_u16(), &body))
                .context(format!("journey request {path} rejected")));
        }

        res.json::<Resp>()
            .await
            .with_context(|| format!("invalid journey response from {path}"))
    }
}

#[async_trait]
impl JourneyService for HttpJourneyService {
    async fn start(&self, request: JourneyStartRequest) -> Result<JourneyStartResponse> {
        self.post("journey/start", &request).await
    }

    async fn resume(&self, request: JourneyResumeRequest) -> Result<JourneyStartResponse> {
        self.post("journey/resume", &request).await
    }

    async fn submit_answers(
        &self,
        request: JourneySubmitAnswersRequest,
    ) -> Result<JourneySubmitAnswersResponse> {
        self.post("journey/submit-answers", &request).await
    }

    async fn submit_feedback(
        &self,
        request: JourneyFeedbackRequest,
    ) -> Result<JourneyFeedbackResponse> {
        self.post("journey/feedback", &request).await
    }

    async fn cancel(&self, request: JourneyCancelRequest) -> Result<JourneyCancelResponse> {
        self.post("journey/cancel", &request).await
    }
}

/// Joins the server url and api prefix into a base that relative endpoint
/// paths can be joined onto (always ends with `/`).
pub fn api_base_url(server_url: &str, api_prefix: &str) -> Result<Url> {
    let server_url = server_url.trim().trim_end_matches('/');
    if !(server_url.starts_with("http://") || server_url.starts_with("https://")) {
        return Err(anyhow!("server_url must start with http:// or https://"));
    }
    let prefix = api_prefix.trim().trim_matches('/');
    let raw = if prefix.is_empty() {
        format!("{server_url}/")
    } else {
        format!("{server_url}/{prefix}/")
    };
    Url::parse(&raw).with_context(|| format!("invalid journey service url '{raw}'"))
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
