use super::entity::IndexRecord;
use crate::domain::{DomainError, DomainResult};

/// Validates all IndexRecord invariants
/// A record that fails here is never published to the index
pub fn validate_index_record(record: &IndexRecord) -> DomainResult<()> {
    validate_deeplinks(record)?;
    validate_title(&record.title)?;
    Ok(())
}

/// A record without any deep link has nothing to point at
fn validate_deeplinks(record: &IndexRecord) -> DomainResult<()> {
    if record.deeplinks.is_empty() {
        return Err(DomainError::InvariantViolation(
            "Index record must carry at least one deeplink".to_string(),
        ));
    }
    Ok(())
}

/// Title cannot be empty
fn validate_title(title: &str) -> DomainResult<()> {
    if title.is_empty() {
        return Err(DomainError::InvariantViolation(
            "Index record title cannot be empty".to_string(),
        ));
    }
    Ok(())
}
