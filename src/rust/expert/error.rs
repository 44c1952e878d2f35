use std::io;

/// Represents the different types of errors that can occur while loading
/// tables, training experts and analyzing records.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExpertError {
    /// The training table could not be read, fetched or parsed
    #[error("Data source error: {0}")]
    DataSource(String),
    /// A table does not have the expected shape, or a feature vector does not
    /// match the schema its model was trained on
    #[error("Schema error: {0}")]
    Schema(String),
    /// The training set cannot produce a meaningful model
    #[error("Training error: {0}")]
    Training(String),
    /// The classifier could not produce a prediction
    #[error("Prediction error: {0}")]
    Prediction(String),
    /// Invalid input parameters
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<io::Error> for ExpertError {
    fn from(err: io::Error) -> Self {
        ExpertError::DataSource(err.to_string())
    }
}

impl From<csv::Error> for ExpertError {
    fn from(err: csv::Error) -> Self {
        ExpertError::DataSource(err.to_string())
    }
}

impl From<reqwest::Error> for ExpertError {
    fn from(err: reqwest::Error) -> Self {
        ExpertError::DataSource(err.to_string())
    }
}
