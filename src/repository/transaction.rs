use futures_util::future::BoxFuture;
use sqlx::{PgConnection, PgPool};

use super::RepositoryError;

/// Runs `work` inside a single transaction.
///
/// The transaction commits when `work` returns `Ok` and is rolled back when it
/// returns `Err`. A failed rollback is logged; the caller always receives the
/// error raised by `work`.
pub async fn unit_of_work<T, F>(
    pool: &PgPool,
    operation: &'static str,
    work: F,
) -> Result<T, RepositoryError>
where
    T: Send,
    F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, RepositoryError>> + Send,
{
    let mut tx = pool.begin().await.map_err(|e| {
        tracing::error!(operation, error = %e, "failed to begin transaction");
        RepositoryError::from(e)
    })?;

    match work(&mut *tx).await {
        Ok(value) => {
            tx.commit().await.map_err(|e| {
                tracing::error!(operation, error = %e, "failed to commit transaction");
                RepositoryError::from(e)
            })?;
            Ok(value)
        }
        Err(err) => {
            tracing::warn!(operation, error = %err, "rolling back transaction");
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(operation, error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}
