use std::borrow::Cow;
use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::errors::FieldError;
use crate::types::{ClaimId, Monetary};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A raw claim row keyed by column header, before validation.
pub type RawClaimRow = BTreeMap<String, String>;

/// A claim row as posted in a JSON upload, where any value type may appear.
pub type JsonClaimRow = serde_json::Map<String, Value>;

/// An uploaded row that may still carry values which are not text.
pub trait UploadedRow {
    /// The text values keyed by header, plus the claim fields whose value was not text.
    fn text_fields(&self) -> (Cow<'_, RawClaimRow>, Vec<ClaimField>);
}

impl UploadedRow for RawClaimRow {
    fn text_fields(&self) -> (Cow<'_, RawClaimRow>, Vec<ClaimField>) {
        (Cow::Borrowed(self), Vec::new())
    }
}

impl UploadedRow for JsonClaimRow {
    fn text_fields(&self) -> (Cow<'_, RawClaimRow>, Vec<ClaimField>) {
        let mut text = RawClaimRow::new();
        let mut mistyped = Vec::new();

        for (key, value) in self {
            match value {
                Value::String(value) => {
                    text.insert(key.clone(), value.clone());
                }
                _ => mistyped.extend(ClaimField::ALL.into_iter().find(|field| field.header() == key))
            }
        }

        (Cow::Owned(text), mistyped)
    }
}

/// The fixed column vocabulary of an uploaded claims file.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ClaimField {
    ClaimId,
    SubscriberId,
    MemberSequence,
    ClaimStatus,
    Billed,
    Allowed,
    Paid,
    ServiceDate,
    ProviderId,
    ProviderName,
    PlaceOfService,
    ClaimType,
    ProcedureCode,
    MemberGender
}

impl ClaimField {
    pub const ALL: [ClaimField; 14] = [
        ClaimField::ClaimId,
        ClaimField::SubscriberId,
        ClaimField::MemberSequence,
        ClaimField::ClaimStatus,
        ClaimField::Billed,
        ClaimField::Allowed,
        ClaimField::Paid,
        ClaimField::ServiceDate,
        ClaimField::ProviderId,
        ClaimField::ProviderName,
        ClaimField::PlaceOfService,
        ClaimField::ClaimType,
        ClaimField::ProcedureCode,
        ClaimField::MemberGender
    ];

    pub fn header(&self) -> &'static str {
        match self {
            ClaimField::ClaimId => "Claim ID",
            ClaimField::SubscriberId => "Subscriber ID",
            ClaimField::MemberSequence => "Member Sequence",
            ClaimField::ClaimStatus => "Claim Status",
            ClaimField::Billed => "Billed",
            ClaimField::Allowed => "Allowed",
            ClaimField::Paid => "Paid",
            ClaimField::ServiceDate => "Service Date",
            ClaimField::ProviderId => "Provider ID",
            ClaimField::ProviderName => "Provider Name",
            ClaimField::PlaceOfService => "Place of Service",
            ClaimField::ClaimType => "Claim Type",
            ClaimField::ProcedureCode => "Procedure Code",
            ClaimField::MemberGender => "Member Gender"
        }
    }

    pub fn from_header(header: &str) -> Option<ClaimField> {
        let header = header.trim();
        ClaimField::ALL.into_iter().find(|field| field.header() == header)
    }

    pub(crate) fn empty_reason(&self) -> &'static str {
        match self {
            ClaimField::ClaimId => "Claim ID is required",
            ClaimField::SubscriberId => "Subscriber ID is required",
            ClaimField::ProviderName => "Provider name is required",
            _ => "Value is required"
        }
    }

    pub(crate) fn format_reason(&self) -> &'static str {
        match self {
            ClaimField::Billed => "Invalid billed amount format",
            ClaimField::Allowed => "Invalid allowed amount format",
            ClaimField::Paid => "Invalid paid amount format",
            ClaimField::ServiceDate => "Invalid service date format",
            _ => "Invalid format"
        }
    }
}

/// A single validated claim.
///
/// Serializes back to the header-named text fields it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    #[serde(rename = "Claim ID")]
    pub claim_id: ClaimId,
    #[serde(rename = "Subscriber ID")]
    pub subscriber_id: String,
    #[serde(rename = "Member Sequence")]
    pub member_sequence: String,
    #[serde(rename = "Claim Status")]
    pub claim_status: String,
    #[serde(rename = "Billed")]
    pub billed: Monetary,
    #[serde(rename = "Allowed")]
    pub allowed: Monetary,
    #[serde(rename = "Paid")]
    pub paid: Monetary,
    #[serde(rename = "Service Date")]
    pub service_date: NaiveDate,
    #[serde(rename = "Provider ID")]
    pub provider_id: String,
    #[serde(rename = "Provider Name")]
    pub provider_name: String,
    #[serde(rename = "Place of Service")]
    pub place_of_service: String,
    #[serde(rename = "Claim Type")]
    pub claim_type: String,
    #[serde(rename = "Procedure Code")]
    pub procedure_code: String,
    #[serde(rename = "Member Gender")]
    pub member_gender: String
}

impl ClaimRecord {
    /// Validates a raw row, collecting every failing field rather than stopping at the first.
    pub fn from_row(row: &RawClaimRow) -> Result<Self, Vec<FieldError>> {
        let mut reader = FieldReader { row, errors: Vec::new() };

        let claim_id = reader.non_empty(ClaimField::ClaimId);
        let subscriber_id = reader.non_empty(ClaimField::SubscriberId);
        let member_sequence = reader.text(ClaimField::MemberSequence);
        let claim_status = reader.text(ClaimField::ClaimStatus);
        let billed = reader.monetary(ClaimField::Billed);
        let allowed = reader.monetary(ClaimField::Allowed);
        let paid = reader.monetary(ClaimField::Paid);
        let service_date = reader.date(ClaimField::ServiceDate);
        let provider_id = reader.text(ClaimField::ProviderId);
        let provider_name = reader.non_empty(ClaimField::ProviderName);
        let place_of_service = reader.text(ClaimField::PlaceOfService);
        let claim_type = reader.text(ClaimField::ClaimType);
        let procedure_code = reader.text(ClaimField::ProcedureCode);
        let member_gender = reader.text(ClaimField::MemberGender);

        let (
            Some(claim_id), Some(subscriber_id), Some(member_sequence), Some(claim_status),
            Some(billed), Some(allowed), Some(paid), Some(service_date),
            Some(provider_id), Some(provider_name), Some(place_of_service),
            Some(claim_type), Some(procedure_code), Some(member_gender)
        ) = (
            claim_id, subscriber_id, member_sequence, claim_status,
            billed, allowed, paid, service_date,
            provider_id, provider_name, place_of_service,
            claim_type, procedure_code, member_gender
        ) else {
            return Err(reader.errors);
        };

        Ok(Self {
            claim_id,
            subscriber_id,
            member_sequence,
            claim_status,
            billed,
            allowed,
            paid,
            service_date,
            provider_id,
            provider_name,
            place_of_service,
            claim_type,
            procedure_code,
            member_gender
        })
    }

    /// Renders the record back into the row shape it was ingested from.
    #[cfg(test)]
    pub fn to_row(&self) -> RawClaimRow {
        ClaimField::ALL
            .into_iter()
            .map(|field| (field.header().to_string(), self.field_text(field)))
            .collect()
    }

    #[cfg(test)]
    pub fn field_text(&self, field: ClaimField) -> String {
        match field {
            ClaimField::ClaimId => self.claim_id.clone(),
            ClaimField::SubscriberId => self.subscriber_id.clone(),
            ClaimField::MemberSequence => self.member_sequence.clone(),
            ClaimField::ClaimStatus => self.claim_status.clone(),
            ClaimField::Billed => self.billed.to_string(),
            ClaimField::Allowed => self.allowed.to_string(),
            ClaimField::Paid => self.paid.to_string(),
            ClaimField::ServiceDate => self.service_date.format(DATE_FORMAT).to_string(),
            ClaimField::ProviderId => self.provider_id.clone(),
            ClaimField::ProviderName => self.provider_name.clone(),
            ClaimField::PlaceOfService => self.place_of_service.clone(),
            ClaimField::ClaimType => self.claim_type.clone(),
            ClaimField::ProcedureCode => self.procedure_code.clone(),
            ClaimField::MemberGender => self.member_gender.clone()
        }
    }
}

struct FieldReader<'a> {
    row: &'a RawClaimRow,
    errors: Vec<FieldError>
}

impl FieldReader<'_> {
    fn text(&mut self, field: ClaimField) -> Option<String> {
        match self.row.get(field.header()) {
            Some(value) => Some(value.clone()),
            None => {
                self.errors.push(FieldError::missing(field));
                None
            }
        }
    }

    fn non_empty(&mut self, field: ClaimField) -> Option<String> {
        let value = self.text(field)?;

        if value.is_empty() {
            self.errors.push(FieldError::empty(field));
            return None;
        }

        Some(value)
    }

    fn monetary(&mut self, field: ClaimField) -> Option<Monetary> {
        let value = self.text(field)?;

        match Monetary::from_str(&value) {
            Ok(amount) => Some(amount),
            Err(_) => {
                self.errors.push(FieldError::invalid_format(field));
                None
            }
        }
    }

    fn date(&mut self, field: ClaimField) -> Option<NaiveDate> {
        let value = self.text(field)?;
        let date = parse_iso_date(&value);

        if date.is_none() {
            self.errors.push(FieldError::invalid_format(field));
        }

        date
    }
}

/// Parses a strict `YYYY-MM-DD` calendar date.
pub(crate) fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10 && bytes.iter().enumerate().all(|(index, byte)| match index {
        4 | 7 => *byte == b'-',
        _ => byte.is_ascii_digit()
    });

    if !shaped {
        return None;
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}
