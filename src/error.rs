/// Error type for efi-battery operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The controller transport failed. Carries the transport's own detail
    /// and is surfaced to callers unchanged.
    #[error("chip transport error: {0}")]
    Chip(String),

    /// A property outside the supported set was queried, or a write was
    /// attempted on this read-only device.
    #[error("unsupported property operation: {0}")]
    Unsupported(String),

    /// The host framework refused the supply registration.
    #[error("power supply registration failed: {0}")]
    Registration(String),
}

impl Error {
    pub(crate) fn chip<S: Into<String>>(msg: S) -> Self {
        Error::Chip(msg.into())
    }

    pub(crate) fn unsupported<S: Into<String>>(msg: S) -> Self {
        Error::Unsupported(msg.into())
    }

    #[allow(dead_code)]
    pub(crate) fn registration<S: Into<String>>(msg: S) -> Self {
        Error::Registration(msg.into())
    }
}

/// Result type for efi-battery operations
pub type Result<T> = std::result::Result<T, Error>;
