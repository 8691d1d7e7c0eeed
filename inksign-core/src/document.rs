//! The contract document: placeholders, services, signer block.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{CoreError, CoreResult};

/// Snapshot of every placeholder's current text, keyed by field identifier.
pub type FieldValues = BTreeMap<String, String>;

/// Identifier of the services list region.
pub const SERVICES_FIELD: &str = "services";
/// Identifier whose value also pre-fills the signer's printed name.
pub const CONTACT_FIELD: &str = "clientContact";
/// Identifier of the client company placeholder.
pub const COMPANY_FIELD: &str = "clientCompanyName";

/// Format of the date shown in the provider's signature block.
pub const PROVIDER_DATE_FORMAT: &str = "%d/%m/%Y";

/// A document region filled with caller-supplied text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Field identifier.
    pub field: String,
    /// Label printed before the value.
    pub label: String,
    /// Current display text.
    pub text: String,
}

impl Placeholder {
    /// Create a placeholder whose initial text is `[LABEL]`.
    #[must_use]
    pub fn new(field: &str, label: &str) -> Self {
        Self {
            field: field.to_string(),
            label: label.to_string(),
            text: format!("[{}]", label.to_uppercase()),
        }
    }

    /// Override the initial text.
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }
}

/// A titled group of placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Section heading.
    pub heading: String,
    /// Placeholders in display order.
    pub placeholders: Vec<Placeholder>,
}

impl Section {
    /// Create a section.
    #[must_use]
    pub fn new(heading: &str, placeholders: Vec<Placeholder>) -> Self {
        Self {
            heading: heading.to_string(),
            placeholders,
        }
    }
}

/// The document a signer reviews, signs and submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractDocument {
    /// Title printed at the top.
    pub title: String,
    sections: Vec<Section>,
    services: Vec<String>,
    signer_name: String,
    contract_date: Option<NaiveDate>,
    provider_date: String,
    controls_visible: bool,
}

impl ContractDocument {
    /// Create an empty document with no sections.
    #[must_use]
    pub fn new(title: &str, today: NaiveDate) -> Self {
        Self {
            title: title.to_string(),
            sections: Vec::new(),
            services: Vec::new(),
            signer_name: String::new(),
            contract_date: Some(today),
            provider_date: today.format(PROVIDER_DATE_FORMAT).to_string(),
            controls_visible: true,
        }
    }

    /// The standard master service agreement layout.
    #[must_use]
    pub fn master_service_agreement(today: NaiveDate) -> Self {
        Self::new("Master Service Agreement", today)
            .with_section(Section::new(
                "Client",
                vec![
                    Placeholder::new(COMPANY_FIELD, "Client Company Name"),
                    Placeholder::new("clientRegistration", "Registration Number"),
                    Placeholder::new("clientAddress", "Client Address"),
                    Placeholder::new(CONTACT_FIELD, "Contact Name"),
                    Placeholder::new("clientEmail", "Contact Email"),
                ],
            ))
            .with_section(Section::new(
                "Commercial Terms",
                vec![
                    Placeholder::new("paymentTerms", "Payment Terms"),
                    Placeholder::new("agreementDuration", "Agreement Duration"),
                    Placeholder::new("warrantyPeriod", "Warranty Period"),
                    Placeholder::new("liabilityCap", "Liability Cap"),
                ],
            ))
            .with_section(Section::new(
                "Additional Requirements",
                vec![Placeholder::new("additionalNotes", "Additional Notes")],
            ))
            .with_services(vec!["[SELECTED SERVICES]".to_string()])
    }

    /// Append a section.
    #[must_use]
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Replace the services list.
    #[must_use]
    pub fn with_services(mut self, services: Vec<String>) -> Self {
        self.services = services;
        self
    }

    /// Sections in display order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// All placeholders in document order.
    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.sections.iter().flat_map(|s| s.placeholders.iter())
    }

    pub(crate) fn placeholders_mut(&mut self) -> impl Iterator<Item = &mut Placeholder> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.placeholders.iter_mut())
    }

    /// Current text of a placeholder.
    #[must_use]
    pub fn field_text(&self, field: &str) -> Option<&str> {
        self.placeholders()
            .find(|p| p.field == field)
            .map(|p| p.text.as_str())
    }

    /// Replace a placeholder's text, as when the user types into it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownField`] if no placeholder has this identifier.
    pub fn set_field_text(&mut self, field: &str, text: &str) -> CoreResult<()> {
        let placeholder = self
            .placeholders_mut()
            .find(|p| p.field == field)
            .ok_or_else(|| CoreError::UnknownField(field.to_string()))?;
        placeholder.text = text.to_string();
        Ok(())
    }

    /// Snapshot of every placeholder's text.
    #[must_use]
    pub fn field_values(&self) -> FieldValues {
        self.placeholders()
            .map(|p| (p.field.clone(), p.text.clone()))
            .collect()
    }

    /// Services list items.
    #[must_use]
    pub fn services(&self) -> &[String] {
        &self.services
    }

    pub(crate) fn set_services(&mut self, services: Vec<String>) {
        self.services = services;
    }

    /// Signer's printed name as typed.
    #[must_use]
    pub fn signer_name(&self) -> &str {
        &self.signer_name
    }

    /// Set the signer's printed name.
    pub fn set_signer_name(&mut self, name: &str) {
        self.signer_name = name.to_string();
    }

    /// Selected contract date.
    #[must_use]
    pub fn contract_date(&self) -> Option<NaiveDate> {
        self.contract_date
    }

    /// Select or clear the contract date.
    pub fn set_contract_date(&mut self, date: Option<NaiveDate>) {
        self.contract_date = date;
    }

    /// Date text in the provider's signature block.
    #[must_use]
    pub fn provider_date(&self) -> &str {
        &self.provider_date
    }

    /// Client company for the submission snapshot.
    ///
    /// Falls back to `Not Specified` when the placeholder is missing or still
    /// shows its template text.
    #[must_use]
    pub fn client_company(&self) -> String {
        self.field_text(COMPANY_FIELD).map_or_else(
            || "Not Specified".to_string(),
            |text| text.replace("[CLIENT COMPANY NAME]", "Not Specified"),
        )
    }

    /// Whether interactive-only regions are drawn.
    #[must_use]
    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    /// Show or hide interactive-only regions.
    pub fn set_controls_visible(&mut self, visible: bool) {
        self.controls_visible = visible;
    }
}
