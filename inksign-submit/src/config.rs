//! Submission configuration.

/// Webhook that receives signed contracts unless configured otherwise.
pub const DEFAULT_WEBHOOK_URL: &str = "https://hook.eu2.make.com/em6i6rh7dh7x5htpyn7wqczpefxqz18d";

/// Configuration for the submission pipeline.
#[derive(Debug, Clone)]
pub struct SubmitConfig {
    /// Endpoint receiving the multipart upload.
    pub endpoint: String,
    /// User agent sent with the upload.
    pub user_agent: String,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmitConfig {
    /// Create a configuration pointing at the default webhook.
    #[must_use]
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_WEBHOOK_URL.to_string(),
            user_agent: format!("inksign/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Use a different endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }
}
