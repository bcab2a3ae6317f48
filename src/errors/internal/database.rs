use thiserror::Error;

/// Infrastructure-level database failures, shared by all stores.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {operation} failed: {source}")]
    Operation {
        operation: String,
        source: sea_orm::DbErr,
    },

    #[error("Failed to begin transaction: {source}")]
    TransactionBegin { source: sea_orm::DbErr },

    #[error("Failed to commit transaction: {source}")]
    TransactionCommit { source: sea_orm::DbErr },
}

impl DatabaseError {
    pub fn operation(operation: &str, source: sea_orm::DbErr) -> Self {
        DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        }
    }
}
