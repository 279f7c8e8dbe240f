use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use tracing::info;

use crate::entities::audit_log;
use crate::errors::ServiceError;

/// Append an audit entry on the caller's connection or transaction.
pub async fn record<C>(
    db: &C,
    user_id: Option<i32>,
    action: impl Into<String>,
) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    let action = action.into();
    info!(user_id, action = %action, "audit");
    audit_log::ActiveModel {
        action: Set(action),
        timestamp: Set(Utc::now()),
        user_id: Set(user_id),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(())
}
