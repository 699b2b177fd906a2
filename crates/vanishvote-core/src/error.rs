use thiserror::Error;

/// Creation-form failures. `Display` is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please enter a question")]
    EmptyQuestion,
    #[error("Please provide at least two options")]
    TooFewOptions,
    #[error("A poll can have at most 10 options")]
    TooManyOptions,
    #[error("Failed to create poll. Please try again.")]
    Submit,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("vote store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("vote store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
