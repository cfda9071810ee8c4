use thiserror::Error;

/// Failures the store lets escape. Missing rows on delete are not errors and
/// uniqueness races are resolved internally, so neither appears here.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The caller handed over a value the data model rejects. The message is
    /// meant to be shown to the user as is.
    #[error("{0}")]
    InvalidInput(String),
    /// The database file could not be opened, read, or written.
    #[error("storage unavailable: {context}")]
    StorageUnavailable {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

impl StoreError {
    pub(crate) fn invalid<S: Into<String>>(message: S) -> Self {
        StoreError::InvalidInput(message.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, StoreError::InvalidInput(_))
    }
}

/// Attach a short description to raw engine errors, mirroring
/// `anyhow::Context` but producing a typed `StoreError`.
pub(crate) trait StorageContext<T> {
    fn storage(self, context: &'static str) -> Result<T, StoreError>;
}

impl<T> StorageContext<T> for Result<T, rusqlite::Error> {
    fn storage(self, context: &'static str) -> Result<T, StoreError> {
        self.map_err(|source| StoreError::StorageUnavailable { context, source })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
