use thiserror::Error;

/// Error type for generation, forecasting and rendering
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("insufficient data: need at least {required} observations, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("model failure in {model}: {message}")]
    ModelFailure { model: String, message: String },

    #[error("cannot {operation} while harness is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("visualization error: {0}")]
    Visualization(String),

    #[error("I/O error")]
    Io(#[source] std::io::Error),

    #[error("CSV error")]
    Csv(#[source] csv::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a model failure
    pub fn model_failure(model: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ModelFailure {
            model: model.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(feature = "visualization")]
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for Error
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        Error::Visualization(format!("chart drawing failed: {}", err))
    }
}
