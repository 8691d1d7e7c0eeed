//! # inksign Submit
//!
//! Turns a signed contract into one multipart webhook request.
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = SigningSession::new(&SubmitConfig::default(), origin, bounds, today)?;
//! session.populate_from_query(query);
//! session.handle_input(&event);
//! session.document_mut().set_signer_name("Jane Doe");
//! session.submit(&mut LogNotifier).await?;
//! ```
//!
//! ## Architecture
//!
//! - `SigningSession` - per-page object owning capture, document and pipeline
//! - `SubmissionPipeline` - validation, rendering and upload state machine
//! - `WebhookClient` - reqwest multipart client
//! - `SubmissionPayload` - PDF, page image and `contractData` snapshot

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod pipeline;
pub mod session;

pub use client::WebhookClient;
pub use config::{SubmitConfig, DEFAULT_WEBHOOK_URL};
pub use error::{SubmitError, SubmitResult, TransmissionError};
pub use payload::{contract_file_name, ContractData, SubmissionPayload};
pub use pipeline::{
    LogNotifier, Notifier, SavedContract, SubmissionPipeline, SubmissionReceipt, SubmissionState,
    SubmitControl, BUSY_LABEL, FAILURE_MESSAGE,
};
pub use session::SigningSession;
