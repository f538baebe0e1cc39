use crate::models::ClaimField;
use thiserror::Error;

/// A single failed field constraint on a claim row, rendered as `<field> - <reason>`.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum FieldError {
    #[error("{} - Required", .field.header())]
    Missing {
        field: ClaimField
    },
    #[error("{} - {}", .field.header(), .field.empty_reason())]
    Empty {
        field: ClaimField
    },
    #[error("{} - {}", .field.header(), .field.format_reason())]
    InvalidFormat {
        field: ClaimField
    },
    #[error("{} - Duplicate claim ID", .field.header())]
    DuplicateClaimId {
        field: ClaimField
    }
}

impl FieldError {
    pub fn missing(field: ClaimField) -> Self {
        Self::Missing { field }
    }

    pub fn empty(field: ClaimField) -> Self {
        Self::Empty { field }
    }

    pub fn invalid_format(field: ClaimField) -> Self {
        Self::InvalidFormat { field }
    }

    pub fn duplicate_claim_id() -> Self {
        Self::DuplicateClaimId { field: ClaimField::ClaimId }
    }

    pub fn field(&self) -> ClaimField {
        match self {
            Self::Missing { field }
            | Self::Empty { field }
            | Self::InvalidFormat { field }
            | Self::DuplicateClaimId { field } => *field
        }
    }
}
