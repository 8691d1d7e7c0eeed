//! Multipart webhook client.

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use url::Url;

use crate::config::SubmitConfig;
use crate::error::{SubmitError, SubmitResult, TransmissionError};
use crate::payload::SubmissionPayload;

/// Client posting signed contracts to the configured webhook.
#[derive(Clone)]
pub struct WebhookClient {
    inner: Arc<InnerClient>,
}

struct InnerClient {
    http: Client,
    endpoint: Url,
}

impl WebhookClient {
    /// Create a client for the endpoint in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::InvalidUrl`] if the URL is malformed.
    /// Returns [`SubmitError::Transmission`] if the HTTP client fails to build.
    pub fn new(config: &SubmitConfig) -> SubmitResult<Self> {
        let endpoint =
            Url::parse(&config.endpoint).map_err(|e| SubmitError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            // Disable proxy detection to avoid macOS system-configuration panic
            .no_proxy()
            .build()
            .map_err(TransmissionError::from)?;

        Ok(Self {
            inner: Arc::new(InnerClient { http, endpoint }),
        })
    }

    /// The endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Send the payload as one multipart POST with `pdf` and `contractData`
    /// parts.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, the request cannot be sent, or
    /// the response status is not 2xx.
    pub async fn send(&self, payload: &SubmissionPayload) -> SubmitResult<()> {
        let contract_data = payload.contract_data_json()?;

        let pdf = Part::bytes(payload.pdf.clone())
            .file_name(payload.file_name.clone())
            .mime_str("application/pdf")
            .map_err(TransmissionError::from)?;
        let form = Form::new()
            .part("pdf", pdf)
            .text("contractData", contract_data);

        let response = self
            .inner
            .http
            .post(self.inner.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(TransmissionError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransmissionError::Status(status.as_u16()).into());
        }

        tracing::debug!("Webhook accepted {} with {}", payload.file_name, status);
        Ok(())
    }
}
