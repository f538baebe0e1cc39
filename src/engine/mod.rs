mod aggregator;
mod errors;
mod ingestor;
mod schema;

pub use aggregator::MrfAggregator;
pub use errors::{AggregationError, IngestError, MrfValidationError};
pub use ingestor::{ClaimIngestor, IngestReport};
