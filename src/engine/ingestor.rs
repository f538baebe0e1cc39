use std::collections::HashSet;
use std::io::Read;

use csv::{ReaderBuilder, Trim};
use serde::Serialize;
use tracing::{debug, info};

use crate::engine::errors::IngestError;
use crate::models::{ClaimField, ClaimRecord, FieldError, RawClaimRow, UploadedRow};
use crate::types::ClaimId;

/// The header row plus 1-based display numbering.
const ROW_NUMBER_OFFSET: usize = 2;

/// Outcome of validating one uploaded batch.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub valid_records: Vec<ClaimRecord>,
    pub row_errors: Vec<String>,
    pub total_row_count: usize
}

/// Turns raw claim rows into validated records without aborting on bad rows.
pub struct ClaimIngestor;

impl ClaimIngestor {
    /// Validates rows that have already been split into header-keyed fields.
    ///
    /// A claim field holding something other than text is reported as an invalid format
    /// for that row only.
    pub fn ingest_rows<R: UploadedRow>(rows: &[R]) -> IngestReport {
        let mut validator = RowValidator::default();

        for (index, row) in rows.iter().enumerate() {
            let (text, mistyped) = row.text_fields();
            validator.validate(index + ROW_NUMBER_OFFSET, &text, &mistyped);
        }

        validator.finish()
    }

    /// Reads a CSV document with a header row and validates every record.
    ///
    /// Records that cannot be parsed (wrong field count, invalid UTF-8) are reported
    /// against their physical line and skipped. Only an unreadable header or an I/O
    /// failure aborts the batch.
    pub fn ingest_csv<R: Read>(input: R) -> Result<IngestReport, IngestError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::Headers)
            .from_reader(input);

        let columns: Vec<Option<ClaimField>> = reader.headers()
            .map_err(IngestError::parse)?
            .iter()
            .map(ClaimField::from_header)
            .collect();

        if columns.is_empty() {
            return Err(IngestError::MissingHeader);
        }

        let mut validator = RowValidator::default();

        for (index, result) in reader.records().enumerate() {
            let row_number = index + ROW_NUMBER_OFFSET;

            match result {
                Ok(record) => {
                    let row: RawClaimRow = columns.iter()
                        .zip(record.iter())
                        .filter_map(|(column, value)| column.map(|field| (field.header().to_string(), value.to_string())))
                        .collect();

                    validator.validate(row_number, &row, &[]);
                }
                Err(error) if error.is_io_error() => return Err(IngestError::parse(error)),
                Err(error) => {
                    let line = error.position().map_or(row_number as u64, |position| position.line());
                    validator.reject(format!("Row {line}: {error}"));
                }
            }
        }

        Ok(validator.finish())
    }
}

#[derive(Default)]
struct RowValidator {
    seen: HashSet<ClaimId>,
    report: IngestReport
}

impl RowValidator {
    fn validate(&mut self, row_number: usize, row: &RawClaimRow, mistyped: &[ClaimField]) {
        self.report.total_row_count += 1;

        match ClaimRecord::from_row(row) {
            Ok(record) if !self.seen.insert(record.claim_id.clone()) => {
                self.reject_fields(row_number, &[FieldError::duplicate_claim_id()]);
            }
            Ok(record) => self.report.valid_records.push(record),
            Err(errors) => {
                let errors: Vec<FieldError> = errors.into_iter()
                    .map(|error| match error {
                        FieldError::Missing { field } if mistyped.contains(&field) => FieldError::invalid_format(field),
                        other => other
                    })
                    .collect();

                self.reject_fields(row_number, &errors);
            }
        }
    }

    fn reject(&mut self, message: String) {
        self.report.total_row_count += 1;
        debug!("{message}");
        self.report.row_errors.push(message);
    }

    fn reject_fields(&mut self, row_number: usize, errors: &[FieldError]) {
        for error in errors {
            let message = format!("Row {row_number}: {error}");
            debug!(field = error.field().header(), "{message}");
            self.report.row_errors.push(message);
        }
    }

    fn finish(self) -> IngestReport {
        info!(
            "Ingested {} of {} claim rows ({} errors)",
            self.report.valid_records.len(),
            self.report.total_row_count,
            self.report.row_errors.len()
        );

        self.report
    }
}
