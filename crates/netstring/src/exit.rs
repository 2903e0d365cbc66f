use std::fmt;
use std::io;

use netstring_frame::FrameError;

// Exit codes follow sysexits-style semantics.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const NOT_FOUND: i32 = 66;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => NOT_FOUND,
        io::ErrorKind::BrokenPipe => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::PayloadTooLarge { .. } | FrameError::InvalidTextLength { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        FrameError::ConnectionClosed => CliError::new(DATA_INVALID, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_frame_errors_to_codes() {
        let closed = frame_error("decode failed", FrameError::ConnectionClosed);
        assert_eq!(closed.code, DATA_INVALID);
        assert!(closed.message.starts_with("decode failed: "));

        let missing = frame_error(
            "open failed",
            FrameError::Io(io::Error::from(io::ErrorKind::NotFound)),
        );
        assert_eq!(missing.code, NOT_FOUND);

        let large = frame_error(
            "write failed",
            FrameError::PayloadTooLarge { size: 10, max: 1 },
        );
        assert_eq!(large.code, DATA_INVALID);

        let invalid = frame_error(
            "write failed",
            FrameError::InvalidTextLength { text_len: 5, size: 2 },
        );
        assert_eq!(invalid.code, DATA_INVALID);
    }
}
