use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("indicator read timeout")]
    Timeout,
    #[error("replay exhausted after {0} readings")]
    ReplayExhausted(usize),
    #[error("unparseable indicator output: {0:?}")]
    Parse(String),
    #[error("indicator command failed: {0}")]
    Command(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DeviceError>;
