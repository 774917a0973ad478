use std::backtrace::Backtrace;
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors detected while building constraints from puzzle parameters.
///
/// Logical contradictions discovered during solving are not errors; they
/// surface as `ConstraintResult::Invalid` and unwind the propagation loop.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid cell name: {name}")]
    InvalidCellName { name: String },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Inner: {inner}\n{backtrace}")]
    Inner {
        inner: Box<ConfigError>,
        backtrace: Box<Backtrace>,
    },
}

impl From<ConfigError> for Error {
    fn from(inner: ConfigError) -> Self {
        Error::Inner {
            inner: Box::new(inner),
            backtrace: Box::new(std::backtrace::Backtrace::capture()),
        }
    }
}
