// src/utils/guard.rs

use crate::error::AppError;

/// Ownership check applied before every mutation of an owned entity.
///
/// The target row must already have been fetched (absent targets are a
/// 404 at the call site); this only answers "is the requester the owner".
pub fn ensure_owner(requester_id: i64, owner_id: i64) -> Result<(), AppError> {
    if requester_id != owner_id {
        return Err(AppError::Forbidden(
            "You are not allowed to modify this resource".to_string(),
        ));
    }
    Ok(())
}
