use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GcpError {
    #[error("history is empty")]
    EmptyHistory,
    #[error("acquisition failed: {0}")]
    Acquisition(String),
    #[error("timeout waiting for indicator")]
    Timeout,
    #[error("no in-scale reading after {attempts} attempts")]
    AcquisitionExhausted { attempts: u32 },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("export error: {0}")]
    Export(String),
}

impl From<std::io::Error> for GcpError {
    fn from(e: std::io::Error) -> Self {
        GcpError::Export(e.to_string())
    }
}

impl From<csv::Error> for GcpError {
    fn from(e: csv::Error) -> Self {
        GcpError::Export(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GcpError>;
