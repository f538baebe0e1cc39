mod errors;
mod monetary;
#[cfg(test)]
mod tests;

pub use errors::MonetaryError;
pub use monetary::Monetary;

pub type ClaimId = String;
pub type MrfFileId = i64;
