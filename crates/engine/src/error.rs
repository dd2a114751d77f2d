use stockroom_core::error::CoreError;

/// PostgreSQL SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for foreign key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Constraint guarding `items.unique_code`.
const UQ_ITEMS_UNIQUE_CODE: &str = "uq_items_unique_code";

/// Error returned by every engine operation.
///
/// Domain outcomes are carried as [`CoreError`]; anything else from the
/// database stays a [`sqlx::Error`] and rolls the transaction back.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Stable machine-readable code; database failures report `INTERNAL_ERROR`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Core(core) => core.kind(),
            Self::Database(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<sqlx::Error> for EngineError {
    /// Constraint violations that correspond to domain rules become
    /// [`CoreError::Conflict`]; everything else stays a database error.
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            match db.code().as_deref() {
                Some(UNIQUE_VIOLATION) if db.constraint() == Some(UQ_ITEMS_UNIQUE_CODE) => {
                    return CoreError::Conflict("Unique code already exists".to_string()).into();
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    let constraint = db.constraint().unwrap_or("unknown");
                    return CoreError::Conflict(format!(
                        "Row is still referenced ({constraint})"
                    ))
                    .into();
                }
                _ => {}
            }
        }
        Self::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_core_kind_passes_through() {
        let err: EngineError = CoreError::Conflict("x".into()).into();
        assert_eq!(err.kind(), "CONFLICT");
        assert_matches!(err, EngineError::Core(CoreError::Conflict(_)));
    }

    #[test]
    fn test_plain_database_error_is_internal() {
        let err: EngineError = sqlx::Error::RowNotFound.into();
        assert_matches!(err, EngineError::Database(sqlx::Error::RowNotFound));
        assert_eq!(err.kind(), "INTERNAL_ERROR");
    }
}
