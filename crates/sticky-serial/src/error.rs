//! Error types for serial transport operations.

/// Result type alias for serial transport operations.
pub type Result<T> = std::result::Result<T, SerialError>;

/// Errors that can occur while opening or pumping a serial source.
#[derive(Debug, thiserror::Error)]
pub enum SerialError {
    /// The serial port could not be opened.
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },

    /// Reading from the source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid decoder or transport configuration.
    #[error("Protocol error: {0}")]
    Protocol(#[from] sticky_core::Error),

    /// The pump task panicked or was cancelled.
    #[error("Pump task failed: {0}")]
    TaskFailed(String),
}

impl SerialError {
    /// Create a new open error.
    pub fn open(path: impl Into<String>, source: serialport::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Whether the error means the device went away and reopening may help.
    pub fn is_disconnect(&self) -> bool {
        match self {
            SerialError::Open { .. } => true,
            SerialError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::NotConnected
                    | std::io::ErrorKind::UnexpectedEof
                    | std::io::ErrorKind::NotFound
                    | std::io::ErrorKind::PermissionDenied
            ),
            _ => false,
        }
    }
}
