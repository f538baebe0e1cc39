mod claim;
mod errors;
mod mrf;
mod place_of_service;

use clap::ValueEnum;
use serde::Serialize;

pub use claim::{ClaimField, ClaimRecord, JsonClaimRow, RawClaimRow, UploadedRow, DATE_FORMAT};
pub(crate) use claim::parse_iso_date;
pub use errors::FieldError;
pub use mrf::{AllowedAmount, MrfDocument, MrfFile, MrfFileSummary, OutOfNetworkItem, ReportingEntity, Payment, ProviderPayment, Tin};
pub use place_of_service::place_of_service_code;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingClass {
    Professional,
    Institutional
}

impl BillingClass {
    /// Only a claim type of "professional" (any case) bills as professional.
    pub fn from_claim_type(claim_type: &str) -> Self {
        if claim_type.eq_ignore_ascii_case("professional") {
            BillingClass::Professional
        } else {
            BillingClass::Institutional
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TinType {
    #[allow(dead_code)]
    Ein,
    Npi
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlanIdType {
    Ein,
    Hios
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlanMarketType {
    Group,
    Individual
}
