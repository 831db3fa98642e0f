use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Unknown field: {0} (editable fields: label, category, tags)")]
    UnknownField(String),

    #[error("Index out of range: {index} (collection holds {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            CoreError::Io(err.into())
        } else {
            CoreError::Serialization(err.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(err: validator::ValidationErrors) -> Self {
        CoreError::Validation(err.to_string())
    }
}

impl CoreError {
    /// True for the error kinds caused by the caller's input rather than the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CoreError::MalformedInput(_)
                | CoreError::UnknownField(_)
                | CoreError::IndexOutOfRange { .. }
                | CoreError::Validation(_)
        )
    }
}
