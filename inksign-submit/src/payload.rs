//! The bundle sent in one submission attempt.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use inksign_core::{ContractDocument, FieldValues};
use inksign_renderer::{RasterImage, RenderedContract, SignatureImage};
use serde::Serialize;

/// Date format used in file names and the snapshot.
pub const CONTRACT_DATE_FORMAT: &str = "%Y-%m-%d";

/// File name for a signed contract: whitespace runs in the name become `_`.
#[must_use]
pub fn contract_file_name(signer_name: &str, date: NaiveDate) -> String {
    let name = signer_name.split_whitespace().collect::<Vec<_>>().join("_");
    format!(
        "Master_Service_Agreement_{name}_{}.pdf",
        date.format(CONTRACT_DATE_FORMAT)
    )
}

/// JSON snapshot sent as the `contractData` part.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractData {
    /// Signer's printed name, trimmed.
    pub client_name: String,
    /// Client company, `Not Specified` when unknown.
    pub client_company: String,
    /// Contract date as `YYYY-MM-DD`.
    pub contract_date: String,
    /// ISO-8601 submission time in UTC.
    pub submission_date_time: String,
    /// The signature surface as a PNG data URL.
    pub signature_data: String,
    /// Every placeholder's current text.
    #[serde(flatten)]
    pub fields: FieldValues,
}

/// Everything one submission sends. Built only once rendering succeeded.
#[derive(Debug, Clone)]
pub struct SubmissionPayload {
    /// File name of the `pdf` part.
    pub file_name: String,
    /// The generated PDF.
    pub pdf: Vec<u8>,
    /// The rasterized page the PDF was built from.
    pub page_image: RasterImage,
    /// The field snapshot.
    pub contract_data: ContractData,
}

impl SubmissionPayload {
    /// Assemble the payload for a rendered contract.
    #[must_use]
    pub fn new(
        document: &ContractDocument,
        date: NaiveDate,
        signature: &SignatureImage,
        rendered: RenderedContract,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let client_name = document.signer_name().trim().to_string();
        let contract_data = ContractData {
            client_name: client_name.clone(),
            client_company: document.client_company(),
            contract_date: date.format(CONTRACT_DATE_FORMAT).to_string(),
            submission_date_time: submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            signature_data: signature.data_url(),
            fields: document.field_values(),
        };
        Self {
            file_name: contract_file_name(&client_name, date),
            pdf: rendered.pdf,
            page_image: rendered.image,
            contract_data,
        }
    }

    /// The `contractData` part as a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn contract_data_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.contract_data)
    }
}
