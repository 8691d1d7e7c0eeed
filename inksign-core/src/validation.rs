//! Pre-submission checks.

use chrono::NaiveDate;

use crate::document::ContractDocument;
use crate::error::ValidationError;

/// Check the inputs a submission needs, in priority order: name, date,
/// signature. The first unmet condition is reported. On success the
/// selected contract date is returned.
///
/// # Errors
///
/// Returns the [`ValidationError`] for the first missing input.
pub fn validate(
    document: &ContractDocument,
    has_signature: bool,
) -> Result<NaiveDate, ValidationError> {
    if document.signer_name().trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    let date = document
        .contract_date()
        .ok_or(ValidationError::MissingDate)?;
    if !has_signature {
        return Err(ValidationError::MissingSignature);
    }
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 1).expect("valid date")
    }

    fn doc(name: &str, dated: bool) -> ContractDocument {
        let mut d = ContractDocument::master_service_agreement(date());
        d.set_signer_name(name);
        if !dated {
            d.set_contract_date(None);
        }
        d
    }

    #[test]
    fn test_all_present() {
        assert_eq!(validate(&doc("Jane Doe", true), true), Ok(date()));
    }

    #[test]
    fn test_name_checked_first() {
        assert_eq!(
            validate(&doc("", false), false),
            Err(ValidationError::MissingName)
        );
        assert_eq!(
            validate(&doc("   ", true), true),
            Err(ValidationError::MissingName)
        );
    }

    #[test]
    fn test_date_before_signature() {
        assert_eq!(
            validate(&doc("Jane", false), false),
            Err(ValidationError::MissingDate)
        );
    }

    #[test]
    fn test_signature_last() {
        let err = validate(&doc("Jane", true), false).expect_err("no signature");
        assert_eq!(err, ValidationError::MissingSignature);
        assert_eq!(err.to_string(), "Please provide your digital signature.");
    }
}
