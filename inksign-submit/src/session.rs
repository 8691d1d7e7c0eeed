//! One signing session: the object a host creates per page load.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use inksign_core::{
    ContractDocument, EventDisposition, InputEvent, MessageEvent, PopulationBridge,
    StrokeCapture, SurfaceBounds,
};
use inksign_renderer::{ContractRenderer, DocumentExporter, PixmapSurface};

use crate::config::SubmitConfig;
use crate::error::SubmitResult;
use crate::pipeline::{
    Notifier, SubmissionPipeline, SubmissionReceipt, SubmissionState, SubmitControl,
};

/// Owns the signature capture, the contract and the submission pipeline.
pub struct SigningSession<R = DocumentExporter> {
    document: ContractDocument,
    capture: StrokeCapture<PixmapSurface>,
    bridge: PopulationBridge,
    pipeline: SubmissionPipeline<R>,
}

impl SigningSession<DocumentExporter> {
    /// Start a session for the standard agreement.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured endpoint is invalid.
    pub fn new(
        config: &SubmitConfig,
        page_origin: &str,
        surface: SurfaceBounds,
        today: NaiveDate,
    ) -> SubmitResult<Self> {
        Ok(Self::from_parts(
            ContractDocument::master_service_agreement(today),
            StrokeCapture::new(PixmapSurface::new(), surface),
            PopulationBridge::new(page_origin),
            SubmissionPipeline::new(config)?,
        ))
    }
}

impl<R: ContractRenderer> SigningSession<R> {
    /// Assemble a session from its parts.
    #[must_use]
    pub fn from_parts(
        document: ContractDocument,
        capture: StrokeCapture<PixmapSurface>,
        bridge: PopulationBridge,
        pipeline: SubmissionPipeline<R>,
    ) -> Self {
        Self {
            document,
            capture,
            bridge,
            pipeline,
        }
    }

    /// Forward an input event from the signature surface.
    pub fn handle_input(&mut self, event: &InputEvent) -> EventDisposition {
        self.capture.handle_event(event)
    }

    /// Blank the signature.
    pub fn clear_signature(&mut self) {
        self.capture.clear();
    }

    /// The signature surface moved or changed size.
    pub fn resize_surface(&mut self, bounds: SurfaceBounds) {
        self.capture.resize(bounds);
    }

    /// Populate fields from the page-load query string.
    pub fn populate_from_query(&mut self, query: &str) -> bool {
        self.bridge.apply_query(&mut self.document, query)
    }

    /// Handle a message posted into the page.
    pub fn handle_message(&mut self, event: &MessageEvent) -> bool {
        self.bridge.handle_message(&mut self.document, event)
    }

    /// Run one submission attempt.
    ///
    /// # Errors
    ///
    /// See [`SubmissionPipeline::submit`].
    pub async fn submit<N: Notifier + ?Sized>(
        &mut self,
        notifier: &mut N,
    ) -> SubmitResult<SubmissionReceipt> {
        self.pipeline
            .submit(&mut self.document, &self.capture, notifier)
            .await
    }

    /// Save the last submitted contract into `dir`.
    ///
    /// # Errors
    ///
    /// See [`SubmissionPipeline::save_contract`].
    pub async fn save_contract(&self, dir: &Path) -> SubmitResult<PathBuf> {
        self.pipeline.save_contract(dir).await
    }

    /// Hide the success confirmation.
    pub fn dismiss_confirmation(&mut self) {
        self.pipeline.dismiss_confirmation();
    }

    /// The contract being signed.
    #[must_use]
    pub fn document(&self) -> &ContractDocument {
        &self.document
    }

    /// Mutable access for direct edits (typing into fields, name, date).
    pub fn document_mut(&mut self) -> &mut ContractDocument {
        &mut self.document
    }

    /// Signature capture state.
    #[must_use]
    pub fn capture(&self) -> &StrokeCapture<PixmapSurface> {
        &self.capture
    }

    /// Pipeline state.
    #[must_use]
    pub fn state(&self) -> SubmissionState {
        self.pipeline.state()
    }

    /// Submit control appearance.
    #[must_use]
    pub fn control(&self) -> &SubmitControl {
        self.pipeline.control()
    }

    /// The pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &SubmissionPipeline<R> {
        &self.pipeline
    }
}
