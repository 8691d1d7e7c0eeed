//! Field population from external data.
//!
//! Two sources feed the same [`populate`] routine: the page's query string
//! and `populateContract` messages posted by a trusted sender.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::document::{ContractDocument, CONTACT_FIELD, SERVICES_FIELD};
use crate::error::{CoreError, CoreResult};

/// Text used when `clientRegistration` is not supplied.
pub const REGISTRATION_FALLBACK: &str = "Not provided";
/// Text used when `additionalNotes` is not supplied.
pub const NOTES_FALLBACK: &str = "No additional requirements specified.";

/// A single supplied value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    /// Plain text.
    Text(String),
    /// Ordered items.
    List(Vec<String>),
}

impl FieldInput {
    fn is_present(&self) -> bool {
        match self {
            Self::Text(text) => !text.is_empty(),
            Self::List(items) => !items.is_empty(),
        }
    }

    /// Display text for a plain placeholder.
    fn display_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::List(items) => items.join(","),
        }
    }

    /// Items for a list region: comma-split for text, trimmed, blanks dropped.
    #[must_use]
    pub fn items(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            Self::Text(text) => text.split(',').collect(),
            Self::List(items) => items.iter().map(String::as_str).collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Array(items) => Some(Self::List(
                items
                    .iter()
                    .filter_map(|v| match v {
                        Value::Null => None,
                        Value::String(s) => Some(s.clone()),
                        other => Some(other.to_string()),
                    })
                    .collect(),
            )),
            other => Some(Self::Text(other.to_string())),
        }
    }
}

impl From<&str> for FieldInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<&str>> for FieldInput {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_string).collect())
    }
}

/// Field identifier → supplied value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulationData(BTreeMap<String, FieldInput>);

impl PopulationData {
    /// Empty data set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one value.
    #[must_use]
    pub fn with(mut self, field: &str, value: impl Into<FieldInput>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    /// Parse a query string (with or without the leading `?`).
    ///
    /// Every parameter becomes a candidate field; values are percent-decoded.
    /// A repeated parameter keeps its last value.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self(
            url::form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), FieldInput::Text(v.into_owned())))
                .collect(),
        )
    }

    /// Build from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidData`] if `value` is not an object.
    pub fn from_json(value: &Value) -> CoreResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| CoreError::InvalidData(format!("expected object, got {value}")))?;
        Ok(Self(
            object
                .iter()
                .filter_map(|(k, v)| FieldInput::from_json(v).map(|input| (k.clone(), input)))
                .collect(),
        ))
    }

    /// Look up a value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldInput> {
        self.0.get(field)
    }

    /// Number of supplied identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Apply `data` to `document`.
///
/// Present values replace placeholder text. Missing `clientRegistration` and
/// `additionalNotes` fall back to fixed text; other missing fields are left
/// alone. `services` replaces the services list when non-empty, and
/// `clientContact` also pre-fills the signer's printed name.
pub fn populate(document: &mut ContractDocument, data: &PopulationData) {
    let mut filled = 0usize;
    for placeholder in document.placeholders_mut() {
        match data.get(&placeholder.field).filter(|v| v.is_present()) {
            Some(value) => {
                placeholder.text = value.display_text();
                filled += 1;
            }
            None => match placeholder.field.as_str() {
                "clientRegistration" => placeholder.text = REGISTRATION_FALLBACK.to_string(),
                "additionalNotes" => placeholder.text = NOTES_FALLBACK.to_string(),
                _ => {}
            },
        }
    }

    if let Some(services) = data.get(SERVICES_FIELD).filter(|v| v.is_present()) {
        let items = services.items();
        tracing::debug!("Populating {} services", items.len());
        document.set_services(items);
    }

    if let Some(FieldInput::Text(contact)) = data.get(CONTACT_FIELD).filter(|v| v.is_present()) {
        document.set_signer_name(contact);
    }

    tracing::debug!("Populated {filled} of {} supplied fields", data.len());
}

/// A message posted into the page.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEvent {
    /// Origin of the sender, e.g. `https://example.com`.
    pub origin: String,
    /// Message payload.
    pub data: Value,
}

/// The message shapes the bridge understands.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum BridgeMessage {
    #[serde(rename = "populateContract")]
    PopulateContract {
        #[serde(rename = "contractData", default)]
        contract_data: Value,
    },
}

/// Accepts population data from the page URL and from trusted messages.
#[derive(Debug, Clone)]
pub struct PopulationBridge {
    page_origin: String,
    trusted_origins: Vec<String>,
}

impl PopulationBridge {
    /// Bridge for a page served from `page_origin`; only same-origin
    /// messages are accepted.
    #[must_use]
    pub fn new(page_origin: &str) -> Self {
        Self {
            page_origin: page_origin.to_string(),
            trusted_origins: Vec::new(),
        }
    }

    /// Additionally accept messages from an embedding origin.
    #[must_use]
    pub fn trust_origin(mut self, origin: &str) -> Self {
        self.trusted_origins.push(origin.to_string());
        self
    }

    /// Whether a sender origin may populate the document.
    #[must_use]
    pub fn is_trusted(&self, origin: &str) -> bool {
        origin == self.page_origin || self.trusted_origins.iter().any(|o| o == origin)
    }

    /// Populate from the page-load query string.
    ///
    /// Returns `false` without touching the document when the query has no
    /// parameters.
    pub fn apply_query(&self, document: &mut ContractDocument, query: &str) -> bool {
        let data = PopulationData::from_query(query);
        if data.is_empty() {
            return false;
        }
        populate(document, &data);
        true
    }

    /// Handle a posted message. Returns whether the document was populated.
    ///
    /// Messages from untrusted origins and messages of other shapes are
    /// ignored.
    pub fn handle_message(&self, document: &mut ContractDocument, event: &MessageEvent) -> bool {
        if !self.is_trusted(&event.origin) {
            tracing::warn!("Ignoring message from untrusted origin {}", event.origin);
            return false;
        }

        let message: BridgeMessage = match serde_json::from_value(event.data.clone()) {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!("Ignoring unrecognised message: {e}");
                return false;
            }
        };

        let BridgeMessage::PopulateContract { contract_data } = message;
        if contract_data.is_null() {
            populate(document, &PopulationData::new());
            return true;
        }
        match PopulationData::from_json(&contract_data) {
            Ok(data) => {
                populate(document, &data);
                true
            }
            Err(e) => {
                tracing::warn!("Ignoring populateContract message: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn doc() -> ContractDocument {
        ContractDocument::master_service_agreement(
            NaiveDate::from_ymd_opt(2026, 1, 2).expect("valid date"),
        )
    }

    #[test]
    fn test_present_values_replace_text() {
        let mut d = doc();
        populate(
            &mut d,
            &PopulationData::new()
                .with("paymentTerms", "Net 30")
                .with("clientCompanyName", "Acme Ltd"),
        );
        assert_eq!(d.field_text("paymentTerms"), Some("Net 30"));
        assert_eq!(d.field_text("clientCompanyName"), Some("Acme Ltd"));
    }

    #[test]
    fn test_missing_fields_fallbacks() {
        let mut d = doc();
        populate(&mut d, &PopulationData::new().with("paymentTerms", "Net 30"));
        assert_eq!(d.field_text("clientRegistration"), Some(REGISTRATION_FALLBACK));
        assert_eq!(d.field_text("additionalNotes"), Some(NOTES_FALLBACK));
        assert_eq!(d.field_text("warrantyPeriod"), Some("[WARRANTY PERIOD]"));
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let mut d = doc();
        populate(
            &mut d,
            &PopulationData::new()
                .with("additionalNotes", "")
                .with("liabilityCap", ""),
        );
        assert_eq!(d.field_text("additionalNotes"), Some(NOTES_FALLBACK));
        assert_eq!(d.field_text("liabilityCap"), Some("[LIABILITY CAP]"));
    }

    #[test]
    fn test_services_string_and_list_render_identically() {
        let mut from_text = doc();
        populate(
            &mut from_text,
            &PopulationData::new().with("services", "A, B, C"),
        );
        let mut from_list = doc();
        populate(
            &mut from_list,
            &PopulationData::new().with("services", vec!["A", "B", "C"]),
        );
        assert_eq!(from_text.services(), &["A", "B", "C"]);
        assert_eq!(from_text, from_list);
    }

    #[test]
    fn test_empty_services_leave_list() {
        let mut d = doc();
        populate(&mut d, &PopulationData::new().with("services", ""));
        assert_eq!(d.services(), &["[SELECTED SERVICES]"]);
    }

    #[test]
    fn test_contact_prefills_signer() {
        let mut d = doc();
        populate(&mut d, &PopulationData::new().with("clientContact", "Ada Lovelace"));
        assert_eq!(d.signer_name(), "Ada Lovelace");
        assert_eq!(d.field_text("clientContact"), Some("Ada Lovelace"));
    }

    #[test]
    fn test_query_decoding() {
        let data = PopulationData::from_query("?clientCompanyName=Acme%20%26%20Sons&services=Web+Design%2C%20SEO");
        assert_eq!(
            data.get("clientCompanyName"),
            Some(&FieldInput::Text("Acme & Sons".into()))
        );
        assert_eq!(
            data.get("services").map(FieldInput::items),
            Some(vec!["Web Design".to_string(), "SEO".to_string()])
        );
    }

    #[test]
    fn test_apply_empty_query_is_noop() {
        let bridge = PopulationBridge::new("https://sign.example.com");
        let mut d = doc();
        assert!(!bridge.apply_query(&mut d, ""));
        assert_eq!(d, doc());
    }

    #[test]
    fn test_same_origin_message_populates() {
        let bridge = PopulationBridge::new("https://sign.example.com");
        let mut d = doc();
        let applied = bridge.handle_message(
            &mut d,
            &MessageEvent {
                origin: "https://sign.example.com".into(),
                data: json!({
                    "type": "populateContract",
                    "contractData": { "services": ["A", "B"], "warrantyPeriod": 12 }
                }),
            },
        );
        assert!(applied);
        assert_eq!(d.services(), &["A", "B"]);
        assert_eq!(d.field_text("warrantyPeriod"), Some("12"));
    }

    #[test]
    fn test_foreign_origin_message_ignored() {
        let bridge = PopulationBridge::new("https://sign.example.com");
        let mut d = doc();
        let applied = bridge.handle_message(
            &mut d,
            &MessageEvent {
                origin: "https://evil.example.net".into(),
                data: json!({
                    "type": "populateContract",
                    "contractData": { "clientCompanyName": "Mallory Inc" }
                }),
            },
        );
        assert!(!applied);
        assert_eq!(d, doc());
    }

    #[test]
    fn test_trusted_embedding_origin() {
        let bridge =
            PopulationBridge::new("https://sign.example.com").trust_origin("https://crm.example.com");
        assert!(bridge.is_trusted("https://crm.example.com"));
        assert!(!bridge.is_trusted("https://crm.example.com.evil.net"));
    }

    #[test]
    fn test_other_message_types_ignored() {
        let bridge = PopulationBridge::new("https://sign.example.com");
        let mut d = doc();
        let applied = bridge.handle_message(
            &mut d,
            &MessageEvent {
                origin: "https://sign.example.com".into(),
                data: json!({ "type": "resize", "height": 900 }),
            },
        );
        assert!(!applied);
        assert_eq!(d, doc());
    }

    #[test]
    fn test_non_object_data_rejected() {
        let err = PopulationData::from_json(&json!([1, 2])).expect_err("array is not an object");
        assert!(matches!(err, CoreError::InvalidData(_)));
    }
}
