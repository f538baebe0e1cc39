use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV parse error: {0}")]
    Parse(String),
    #[error("CSV parse error: input has no header row")]
    MissingHeader
}

impl IngestError {
    pub fn parse(error: csv::Error) -> Self {
        Self::Parse(error.to_string())
    }
}

/// Structural problems found in an assembled MRF document, one `path: message` entry per issue.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("MRF validation failed: {}", .issues.join("; "))]
pub struct MrfValidationError {
    pub issues: Vec<String>
}

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("No approved claims to aggregate")]
    NoClaims,
    #[error("Allowed amount overflow for procedure [{procedure_code}] and provider [{provider_id}]")]
    Overflow {
        procedure_code: String,
        provider_id: String
    },
    #[error(transparent)]
    Validation(#[from] MrfValidationError),
    #[error("Failed to serialize MRF document: {0}")]
    Serialization(#[from] serde_json::Error)
}
