#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("cannot aggregate an empty catalog")]
    EmptyCatalog,
}

impl FilterError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
