use serde::Serialize;
use std::io::ErrorKind;
use thiserror::Error;

/// Main error type for grab operations
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("varint too long")]
    VarintTooLong,

    #[error("banner too long: {0} bytes declared")]
    BannerTooLong(u64),

    #[error("zero-length banner")]
    EmptyBanner,

    #[error("banner length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: u64, actual: u64 },

    #[error("read timeout")]
    ReadTimeout,

    #[error("connect timeout")]
    ConnectTimeout,

    #[error("invalid probe: {0}")]
    Probe(String),

    #[error("invalid target: {0}")]
    InvalidTarget(String),
}

/// Coarse per-target outcome reported in results. Read timeouts and
/// structural violations count as protocol errors since they signal a
/// non-conformant server rather than a network failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanStatus {
    Success,
    ConnectionRefused,
    ConnectionTimeout,
    IoTimeout,
    ProtocolError,
    UnknownError,
}

impl ScanError {
    /// Classify this error into a scan status
    pub fn status(&self) -> ScanStatus {
        match self {
            ScanError::Io(e) => classify_io_error(e),
            ScanError::VarintTooLong
            | ScanError::BannerTooLong(_)
            | ScanError::EmptyBanner
            | ScanError::LengthMismatch { .. }
            | ScanError::ReadTimeout => ScanStatus::ProtocolError,
            ScanError::ConnectTimeout => ScanStatus::ConnectionTimeout,
            ScanError::Probe(_) | ScanError::InvalidTarget(_) => ScanStatus::UnknownError,
        }
    }
}

/// Map a transport-level error onto a scan status
pub fn classify_io_error(e: &std::io::Error) -> ScanStatus {
    match e.kind() {
        ErrorKind::ConnectionRefused => ScanStatus::ConnectionRefused,
        ErrorKind::TimedOut | ErrorKind::WouldBlock => ScanStatus::IoTimeout,
        _ => {
            // For unknown kinds, try to infer from the error message
            let error_msg = e.to_string().to_lowercase();
            if error_msg.contains("refused") {
                ScanStatus::ConnectionRefused
            } else if error_msg.contains("timed out") || error_msg.contains("timeout") {
                ScanStatus::IoTimeout
            } else {
                ScanStatus::UnknownError
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_protocol_errors_classify_as_protocol() {
        assert_eq!(ScanError::VarintTooLong.status(), ScanStatus::ProtocolError);
        assert_eq!(ScanError::BannerTooLong(40000).status(), ScanStatus::ProtocolError);
        assert_eq!(ScanError::EmptyBanner.status(), ScanStatus::ProtocolError);
        assert_eq!(
            ScanError::LengthMismatch { expected: 9, actual: 8 }.status(),
            ScanStatus::ProtocolError
        );
    }

    #[test]
    fn test_read_timeout_is_protocol_not_transport() {
        assert_eq!(ScanError::ReadTimeout.status(), ScanStatus::ProtocolError);
    }

    #[test]
    fn test_io_error_classification() {
        let refused = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
        assert_eq!(classify_io_error(&refused), ScanStatus::ConnectionRefused);

        let timed_out = io::Error::new(io::ErrorKind::TimedOut, "timed out");
        assert_eq!(classify_io_error(&timed_out), ScanStatus::IoTimeout);

        let other = io::Error::other("connection refused by peer");
        assert_eq!(classify_io_error(&other), ScanStatus::ConnectionRefused);

        let unknown = io::Error::other("something else");
        assert_eq!(classify_io_error(&unknown), ScanStatus::UnknownError);
    }
}
