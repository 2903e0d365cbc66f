/// Errors raised at the I/O edges of the codec.
///
/// The decoder itself never fails: malformed input is resynchronized over.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A mixed message's text length runs past the end of its data.
    #[error("mixed message text length {text_len} exceeds data length {size}")]
    InvalidTextLength { text_len: usize, size: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended in the middle of a frame, or the writer made no progress.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
