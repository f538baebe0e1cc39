use crate::engine::errors::MrfValidationError;
use crate::models::{parse_iso_date, AllowedAmount, MrfDocument, OutOfNetworkItem};
use crate::types::Monetary;

/// Checks an assembled document against the structural rules of the out-of-network schema.
///
/// Enumerated fields are closed types already. Free-text claim values (procedure code,
/// provider id) may legitimately be empty and are not checked; the document-level text
/// the publisher controls is.
pub fn validate_document(document: &MrfDocument) -> Result<(), MrfValidationError> {
    let mut issues = Issues::default();

    issues.require_text("reporting_entity_name", &document.reporting_entity_name);
    issues.require_text("reporting_entity_type", &document.reporting_entity_type);
    issues.require_text("version", &document.version);

    if let Some(plan_name) = &document.plan_name {
        issues.require_text("plan_name", plan_name);
    }

    if let Some(plan_id) = &document.plan_id {
        issues.require_text("plan_id", plan_id);
    }

    if parse_iso_date(&document.last_updated_on).is_none() {
        issues.push("last_updated_on", "must be a YYYY-MM-DD date");
    }

    for (index, item) in document.out_of_network.iter().enumerate() {
        validate_item(&mut issues, &format!("out_of_network[{index}]"), item);
    }

    issues.into_result()
}

fn validate_item(issues: &mut Issues, path: &str, item: &OutOfNetworkItem) {
    issues.require_text(&format!("{path}.name"), &item.name);
    issues.require_text(&format!("{path}.billing_code_type"), &item.billing_code_type);
    issues.require_text(&format!("{path}.billing_code_type_version"), &item.billing_code_type_version);

    if item.allowed_amounts.is_empty() {
        issues.push(&format!("{path}.allowed_amounts"), "must contain at least one entry");
    }

    for (index, allowed) in item.allowed_amounts.iter().enumerate() {
        validate_allowed_amount(issues, &format!("{path}.allowed_amounts[{index}]"), allowed);
    }
}

fn validate_allowed_amount(issues: &mut Issues, path: &str, allowed: &AllowedAmount) {
    if allowed.service_code.as_ref().is_some_and(Vec::is_empty) {
        issues.push(&format!("{path}.service_code"), "must contain at least one entry when present");
    }

    if allowed.payments.is_empty() {
        issues.push(&format!("{path}.payments"), "must contain at least one entry");
    }

    for (index, payment) in allowed.payments.iter().enumerate() {
        let payment_path = format!("{path}.payments[{index}]");
        issues.require_non_negative(&format!("{payment_path}.allowed_amount"), &payment.allowed_amount);

        for (provider_index, provider) in payment.providers.iter().enumerate() {
            let provider_path = format!("{payment_path}.providers[{provider_index}]");
            issues.require_non_negative(&format!("{provider_path}.billed_charge"), &provider.billed_charge);

            if provider.npi.is_empty() {
                issues.push(&format!("{provider_path}.npi"), "must contain at least one entry");
            }
        }
    }
}

#[derive(Default)]
struct Issues(Vec<String>);

impl Issues {
    fn push(&mut self, path: &str, message: &str) {
        self.0.push(format!("{path}: {message}"));
    }

    fn require_text(&mut self, path: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(path, "is required");
        }
    }

    fn require_non_negative(&mut self, path: &str, value: &Monetary) {
        if value.is_negative() {
            self.push(path, "must not be negative");
        }
    }

    fn into_result(self) -> Result<(), MrfValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(MrfValidationError { issues: self.0 })
        }
    }
}
