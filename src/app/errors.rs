use crate::dataset::LoadError;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("movie '{0}' not found in database")]
    NotFound(String),

    #[error("data not loaded")]
    NotLoaded,

    #[error("{0}")]
    Validation(String),

    #[error("failed to load dataset: {0}")]
    Load(#[from] LoadError),
}
