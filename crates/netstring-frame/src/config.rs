use crate::codec::{DEFAULT_END_SYMBOL, DEFAULT_LENGTH_SEPARATOR, DEFAULT_SEPARATOR};

/// Default capacity of each bounded output queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Configuration shared by the decoder, reader and writer.
///
/// Delimiters should only be changed between frames.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Separator between the length header and the payload. Default: `:`.
    pub separator_symbol: u8,
    /// Separator between the text length and the binary length. Default: `,`.
    pub length_separator_symbol: u8,
    /// Frame terminator. Default: `,`.
    pub end_symbol: u8,
    /// Capacity of each output queue created by [`crate::Decoder::new`].
    pub queue_capacity: usize,
    /// Emit a trace event for every parsed byte.
    pub verbose: bool,
    /// Largest declared payload accepted. `None` means unbounded.
    pub max_payload_size: Option<usize>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            separator_symbol: DEFAULT_SEPARATOR,
            length_separator_symbol: DEFAULT_LENGTH_SEPARATOR,
            end_symbol: DEFAULT_END_SYMBOL,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            verbose: false,
            max_payload_size: None,
        }
    }
}

impl FrameConfig {
    /// Default configuration with a different terminator.
    pub fn with_end_symbol(end_symbol: u8) -> Self {
        Self {
            end_symbol,
            ..Self::default()
        }
    }
}
