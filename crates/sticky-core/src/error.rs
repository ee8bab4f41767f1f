use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Frame construction errors
    #[error("Payload length {len} is below the protocol floor of {min}")]
    PayloadTooShort { len: usize, min: usize },

    #[error("Payload length {len} exceeds the maximum of {max}")]
    PayloadTooLong { len: usize, max: usize },

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
