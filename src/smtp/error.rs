//! Error types for the SMTP server

use thiserror::Error;

/// Failures that end a capture session
#[derive(Error, Debug)]
pub enum SmtpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line exceeds {max} bytes")]
    LineTooLong { max: usize },
}

impl SmtpError {
    /// Whether the error is the peer going quiet past the idle timeout
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            SmtpError::Io(e) if matches!(
                e.kind(),
                std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
            )
        )
    }
}
