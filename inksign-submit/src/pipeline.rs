//! The submission state machine.
//!
//! ```text
//! Idle ─▶ Validating ─▶ Rendering ─▶ Uploading ─▶ Succeeded ─▶ Idle
//!             │              │            │
//!             ▼              └────────────┴─────▶ Failed ────▶ Idle
//!            Idle
//! ```
//!
//! The current state lives in one field. The submit control's appearance is
//! derived from the transitions, never read back to infer the state.

use std::ops::Deref;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use inksign_core::{validate, ContractDocument, StrokeCapture};
use inksign_renderer::export::SUBMIT_LABEL;
use inksign_renderer::{ContractRenderer, DocumentExporter, PixmapSurface};

use crate::client::WebhookClient;
use crate::config::SubmitConfig;
use crate::error::{SubmitError, SubmitResult};
use crate::payload::SubmissionPayload;

/// Label shown on the submit control while a submission runs.
pub const BUSY_LABEL: &str = "Submitting...";

/// Message shown for any rendering or transmission failure.
pub const FAILURE_MESSAGE: &str =
    "There was an error submitting your contract. Please try again or contact support.";

/// Where a submission attempt currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    /// Waiting for the user.
    Idle,
    /// Checking name, date and signature.
    Validating,
    /// Rasterizing the document and composing the PDF.
    Rendering,
    /// Sending the payload.
    Uploading,
    /// The endpoint accepted the payload.
    Succeeded,
    /// Rendering or upload failed.
    Failed,
}

/// Visible state of the submit control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    /// Whether the control accepts clicks.
    pub enabled: bool,
    /// Whether the busy indicator is shown.
    pub busy: bool,
    /// Control label.
    pub label: &'static str,
    /// Whether the success confirmation is shown.
    pub confirmation_visible: bool,
}

impl Default for SubmitControl {
    fn default() -> Self {
        Self {
            enabled: true,
            busy: false,
            label: SUBMIT_LABEL,
            confirmation_visible: false,
        }
    }
}

impl SubmitControl {
    fn restore(&mut self) {
        self.enabled = true;
        self.busy = false;
        self.label = SUBMIT_LABEL;
    }
}

/// Receives user-facing feedback from the pipeline.
pub trait Notifier {
    /// Show a blocking message.
    fn alert(&mut self, message: &str);

    /// Show the success confirmation.
    fn show_confirmation(&mut self) {}

    /// Observe a state transition.
    fn state_changed(&mut self, _state: SubmissionState) {}
}

/// Notifier that only writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&mut self, message: &str) {
        tracing::warn!("{message}");
    }

    fn show_confirmation(&mut self) {
        tracing::info!("Contract submitted");
    }
}

/// A successfully submitted contract kept for a local save.
#[derive(Debug, Clone)]
pub struct SavedContract {
    /// Signer's printed name.
    pub signer_name: String,
    /// Contract date.
    pub contract_date: NaiveDate,
    /// File name used for upload and save.
    pub file_name: String,
    /// The PDF bytes.
    pub pdf: Vec<u8>,
}

impl SavedContract {
    /// Write the PDF into `dir` under its file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.pdf).await?;
        tracing::info!("Saved contract to {}", path.display());
        Ok(path)
    }
}

/// Summary of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// File name of the uploaded PDF.
    pub file_name: String,
    /// When the payload was built.
    pub submitted_at: DateTime<Utc>,
}

/// Sets a document's interactive-only regions hidden for as long as it lives.
struct HiddenControls<'a> {
    document: &'a mut ContractDocument,
    was_visible: bool,
}

impl<'a> HiddenControls<'a> {
    fn new(document: &'a mut ContractDocument) -> Self {
        let was_visible = document.controls_visible();
        document.set_controls_visible(false);
        Self {
            document,
            was_visible,
        }
    }
}

impl Deref for HiddenControls<'_> {
    type Target = ContractDocument;

    fn deref(&self) -> &ContractDocument {
        self.document
    }
}

impl Drop for HiddenControls<'_> {
    fn drop(&mut self) {
        self.document.set_controls_visible(self.was_visible);
    }
}

/// One submission attempt in flight. Owns the state transitions and puts the
/// control back on every exit, including when the future is dropped.
struct Attempt<'a, N: Notifier + ?Sized> {
    state: &'a mut SubmissionState,
    control: &'a mut SubmitControl,
    notifier: &'a mut N,
    settled: bool,
}

impl<'a, N: Notifier + ?Sized> Attempt<'a, N> {
    fn begin(
        state: &'a mut SubmissionState,
        control: &'a mut SubmitControl,
        notifier: &'a mut N,
    ) -> Self {
        control.enabled = false;
        let mut attempt = Self {
            state,
            control,
            notifier,
            settled: false,
        };
        attempt.transition(SubmissionState::Validating);
        attempt
    }

    fn transition(&mut self, next: SubmissionState) {
        tracing::debug!("Submission {:?} -> {:?}", *self.state, next);
        *self.state = next;
        self.notifier.state_changed(next);
    }

    fn settle(mut self) {
        self.control.restore();
        self.transition(SubmissionState::Idle);
        self.settled = true;
    }

    fn fail(mut self, error: &SubmitError) {
        self.transition(SubmissionState::Failed);
        tracing::error!("Submission error: {error}");
        self.notifier.alert(FAILURE_MESSAGE);
        self.settle();
    }
}

impl<N: Notifier + ?Sized> Drop for Attempt<'_, N> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        tracing::warn!("Submission abandoned while {:?}", *self.state);
        self.transition(SubmissionState::Failed);
        self.control.restore();
        self.transition(SubmissionState::Idle);
    }
}

/// Validates, renders and uploads a signed contract.
pub struct SubmissionPipeline<R = DocumentExporter> {
    renderer: R,
    client: WebhookClient,
    state: SubmissionState,
    control: SubmitControl,
    saved: Option<SavedContract>,
}

impl SubmissionPipeline<DocumentExporter> {
    /// Create a pipeline with the default exporter.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured endpoint is invalid.
    pub fn new(config: &SubmitConfig) -> SubmitResult<Self> {
        Self::with_renderer(config, DocumentExporter::with_defaults())
    }
}

impl<R: ContractRenderer> SubmissionPipeline<R> {
    /// Create a pipeline with a custom renderer.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured endpoint is invalid.
    pub fn with_renderer(config: &SubmitConfig, renderer: R) -> SubmitResult<Self> {
        Ok(Self {
            renderer,
            client: WebhookClient::new(config)?,
            state: SubmissionState::Idle,
            control: SubmitControl::default(),
            saved: None,
        })
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Current submit control appearance.
    #[must_use]
    pub fn control(&self) -> &SubmitControl {
        &self.control
    }

    /// The last successfully submitted contract.
    #[must_use]
    pub fn saved_contract(&self) -> Option<&SavedContract> {
        self.saved.as_ref()
    }

    /// Hide the success confirmation.
    pub fn dismiss_confirmation(&mut self) {
        self.control.confirmation_visible = false;
    }

    /// Save the last submitted contract into `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::NothingToSave`] if nothing was submitted yet, or
    /// an I/O error if writing fails.
    pub async fn save_contract(&self, dir: &Path) -> SubmitResult<PathBuf> {
        let saved = self.saved.as_ref().ok_or(SubmitError::NothingToSave)?;
        Ok(saved.save_to(dir).await?)
    }

    /// Run one submission attempt.
    ///
    /// Validation failures report their own message; rendering and upload
    /// failures report [`FAILURE_MESSAGE`]. Entered data is never modified,
    /// so a failed attempt can be retried as is.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::InProgress`] if an attempt is already running,
    /// otherwise the error that ended this attempt.
    pub async fn submit<N: Notifier + ?Sized>(
        &mut self,
        document: &mut ContractDocument,
        capture: &StrokeCapture<PixmapSurface>,
        notifier: &mut N,
    ) -> SubmitResult<SubmissionReceipt> {
        if self.state != SubmissionState::Idle {
            return Err(SubmitError::InProgress);
        }

        let Self {
            renderer,
            client,
            state,
            control,
            saved,
        } = self;
        let mut attempt = Attempt::begin(state, control, notifier);

        let date = match validate(document, capture.has_mark()) {
            Ok(date) => date,
            Err(e) => {
                tracing::debug!("Validation failed: {e}");
                attempt.notifier.alert(&e.to_string());
                attempt.settle();
                return Err(e.into());
            }
        };

        attempt.control.confirmation_visible = false;
        attempt.control.busy = true;
        attempt.control.label = BUSY_LABEL;

        match render_and_upload(&*renderer, client, document, capture, date, &mut attempt).await {
            Ok((payload, submitted_at)) => {
                let receipt = SubmissionReceipt {
                    file_name: payload.file_name.clone(),
                    submitted_at,
                };
                *saved = Some(SavedContract {
                    signer_name: payload.contract_data.client_name,
                    contract_date: date,
                    file_name: payload.file_name,
                    pdf: payload.pdf,
                });
                attempt.transition(SubmissionState::Succeeded);
                tracing::info!("Submitted {}", receipt.file_name);
                attempt.control.confirmation_visible = true;
                attempt.notifier.show_confirmation();
                attempt.settle();
                Ok(receipt)
            }
            Err(e) => {
                attempt.fail(&e);
                Err(e)
            }
        }
    }
}

async fn render_and_upload<R: ContractRenderer, N: Notifier + ?Sized>(
    renderer: &R,
    client: &WebhookClient,
    document: &mut ContractDocument,
    capture: &StrokeCapture<PixmapSurface>,
    date: NaiveDate,
    attempt: &mut Attempt<'_, N>,
) -> SubmitResult<(SubmissionPayload, DateTime<Utc>)> {
    attempt.transition(SubmissionState::Rendering);
    let signature = capture.surface().snapshot()?;
    let rendered = {
        let hidden = HiddenControls::new(document);
        renderer.render(&hidden, &signature)?
    };

    attempt.transition(SubmissionState::Uploading);
    let submitted_at = Utc::now();
    let payload = SubmissionPayload::new(document, date, &signature, rendered, submitted_at);
    client.send(&payload).await?;
    Ok((payload, submitted_at))
}
