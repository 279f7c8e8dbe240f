/*!
 * Transaction helpers.
 *
 * Services open a transaction with `db.begin()`, run every statement against
 * it and hand the outcome to [`settle`], which commits on success and rolls
 * back on failure so no partial writes survive an error.
 */

use crate::errors::ServiceError;
use sea_orm::DatabaseTransaction;
use tracing::{error, warn};

/// Commit `txn` when `result` is `Ok`, roll it back otherwise.
pub async fn settle<T>(
    txn: DatabaseTransaction,
    result: Result<T, ServiceError>,
) -> Result<T, ServiceError> {
    match result {
        Ok(value) => {
            txn.commit().await.map_err(|e| {
                error!(error = %e, "Failed to commit transaction");
                ServiceError::DatabaseError(e)
            })?;
            Ok(value)
        }
        Err(err) => {
            warn!(error = %err, "Rolling back transaction");
            if let Err(rollback_err) = txn.rollback().await {
                error!(error = %rollback_err, "Failed to roll back transaction");
            }
            Err(err)
        }
    }
}
