use thiserror::Error;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// SQLSTATE reported by Postgres, if this wraps a database error
    fn sql_state(&self) -> Option<String> {
        match self {
            StorageError::Database(sqlx::Error::Database(e)) => e.code().map(|c| c.into_owned()),
            _ => None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.sql_state().as_deref() == Some(UNIQUE_VIOLATION)
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        self.sql_state().as_deref() == Some(FOREIGN_KEY_VIOLATION)
    }

    pub fn is_check_violation(&self) -> bool {
        self.sql_state().as_deref() == Some(CHECK_VIOLATION)
    }

    /// Rows refused by a unique or check constraint surface as `ConstraintViolation`
    pub fn rejected_row(self) -> Self {
        if !(self.is_unique_violation() || self.is_check_violation()) {
            return self;
        }
        match self {
            StorageError::Database(sqlx::Error::Database(e)) => {
                StorageError::ConstraintViolation(e.message().to_string())
            }
            other => other,
        }
    }

    /// A dangling competition reference surfaces as `NotFound`
    pub fn missing_reference(self) -> Self {
        if self.is_foreign_key_violation() {
            StorageError::NotFound
        } else {
            self
        }
    }
}
