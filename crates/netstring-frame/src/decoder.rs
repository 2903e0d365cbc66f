use bytes::BytesMut;

use crate::config::FrameConfig;
use crate::message::MixedMessage;
use crate::sink::{ChannelSink, DecoderOutput, FrameSink};

/// Position of the decoder within the frame grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Accumulating the primary (text) length digits. Initial and resync state.
    Length,
    /// Accumulating the binary length digits of a mixed frame.
    BinLength,
    /// Expecting `:` (payload follows) or `,` (binary length follows).
    Separator,
    /// Copying opaque payload bytes.
    Data,
    /// Expecting the terminator.
    End,
    /// Discarding the payload and terminator of a frame over the size limit.
    Skip,
}

/// Incremental netstring decoder.
///
/// Feed it chunks split at arbitrary boundaries; every completed frame is
/// published to the sink `S` before the next byte is examined. Malformed
/// headers and unexpected terminators discard the frame in progress and
/// parsing resumes at the next byte.
///
/// A decoder belongs to exactly one stream. Independent streams use
/// independent decoders.
#[derive(Debug)]
pub struct Decoder<S = ChannelSink> {
    state: ParseState,
    /// Remaining payload bytes once in `Data` (payload plus terminator in
    /// `Skip`); the text length before that.
    declared_len: usize,
    /// Zero for plain frames.
    binary_len: usize,
    buf: BytesMut,
    config: FrameConfig,
    sink: S,
}

impl Decoder<ChannelSink> {
    /// Create a decoder publishing to bounded queues of the default capacity.
    pub fn new() -> (Self, DecoderOutput) {
        Self::with_config(FrameConfig::default())
    }

    /// Create a decoder publishing to bounded queues of
    /// `config.queue_capacity` entries each.
    pub fn with_config(config: FrameConfig) -> (Self, DecoderOutput) {
        let (sink, output) = ChannelSink::bounded(config.queue_capacity);
        (Self::with_sink(sink, config), output)
    }
}

impl<S: FrameSink> Decoder<S> {
    /// Create a decoder publishing to an arbitrary sink.
    pub fn with_sink(sink: S, config: FrameConfig) -> Self {
        Self {
            state: ParseState::Length,
            declared_len: 0,
            binary_len: 0,
            buf: BytesMut::new(),
            config,
            sink,
        }
    }

    /// Advance the state machine over every byte of `chunk`.
    ///
    /// Blocks while the sink is full.
    pub fn feed(&mut self, chunk: &[u8]) {
        let mut pos = 0usize;
        while pos < chunk.len() {
            pos = match self.state {
                ParseState::Length | ParseState::BinLength => self.parse_length(chunk, pos),
                ParseState::Separator => self.parse_separator(chunk, pos),
                ParseState::Data => self.parse_data(chunk, pos),
                ParseState::End => self.parse_end(chunk, pos),
                ParseState::Skip => self.skip_oversized(chunk, pos),
            };
        }
    }

    /// Discard the frame in progress and return to the initial state.
    pub fn reset(&mut self) {
        self.state = ParseState::Length;
        self.declared_len = 0;
        self.binary_len = 0;
        self.buf.clear();
    }

    /// Current parse state.
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// True when no frame is partially assembled.
    pub fn is_idle(&self) -> bool {
        self.state == ParseState::Length
            && self.declared_len == 0
            && self.binary_len == 0
            && self.buf.is_empty()
    }

    /// Change the frame terminator. Call between frames.
    pub fn set_end_symbol(&mut self, symbol: u8) {
        self.config.end_symbol = symbol;
    }

    /// Toggle per-byte trace events.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.config.verbose = verbose;
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the decoder, dropping any partial frame.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn parse_length(&mut self, chunk: &[u8], pos: usize) -> usize {
        let symbol = chunk[pos];
        self.trace_symbol(symbol);

        if !symbol.is_ascii_digit() {
            self.state = ParseState::Separator;
            return pos;
        }

        let binary = self.state == ParseState::BinLength;
        let current = if binary {
            self.binary_len
        } else {
            self.declared_len
        };

        match fold_digit(current, symbol) {
            Some(value) if binary => self.binary_len = value,
            Some(value) => self.declared_len = value,
            None => self.resync("length field overflow"),
        }
        pos + 1
    }

    fn parse_separator(&mut self, chunk: &[u8], pos: usize) -> usize {
        let symbol = chunk[pos];
        self.trace_symbol(symbol);

        if symbol == self.config.separator_symbol {
            match self.declared_len.checked_add(self.binary_len) {
                Some(total) if self.config.max_payload_size.is_none_or(|max| total <= max) => {
                    self.declared_len = total;
                    self.state = ParseState::Data;
                }
                Some(total) => self.start_skip(total),
                None => self.resync("declared payload overflow"),
            }
        } else if symbol == self.config.length_separator_symbol {
            self.state = ParseState::BinLength;
        } else {
            self.resync("unexpected separator");
        }
        pos + 1
    }

    fn parse_data(&mut self, chunk: &[u8], pos: usize) -> usize {
        let take = self.declared_len.min(chunk.len() - pos);
        if self.config.verbose {
            tracing::trace!(state = ?self.state, bytes = take, "parse");
        }

        self.buf.extend_from_slice(&chunk[pos..pos + take]);
        self.declared_len -= take;
        if self.declared_len == 0 {
            self.state = ParseState::End;
        }
        pos + take
    }

    fn start_skip(&mut self, total: usize) {
        tracing::debug!(
            size = total,
            max = ?self.config.max_payload_size,
            "declared payload exceeds limit; skipping frame"
        );
        self.reset();
        self.declared_len = total.saturating_add(1);
        self.state = ParseState::Skip;
    }

    fn skip_oversized(&mut self, chunk: &[u8], pos: usize) -> usize {
        let take = self.declared_len.min(chunk.len() - pos);
        if self.config.verbose {
            tracing::trace!(state = ?self.state, bytes = take, "skip");
        }

        self.declared_len -= take;
        if self.declared_len == 0 {
            self.state = ParseState::Length;
        }
        pos + take
    }

    fn parse_end(&mut self, chunk: &[u8], pos: usize) -> usize {
        let symbol = chunk[pos];
        self.trace_symbol(symbol);

        if symbol == self.config.end_symbol {
            self.deliver();
        } else {
            tracing::debug!(
                symbol = %symbol.escape_ascii(),
                size = self.buf.len(),
                "unexpected terminator; frame dropped"
            );
        }
        self.reset();
        pos + 1
    }

    /// Publish the assembled frame. Runs before `reset`, which clears
    /// `binary_len` and the buffer.
    fn deliver(&mut self) {
        let payload = self.buf.split().freeze();
        if self.binary_len == 0 {
            tracing::debug!(size = payload.len(), "plain frame complete");
            self.sink.plain(payload);
        } else {
            debug_assert!(payload.len() >= self.binary_len);
            let text_len = payload.len() - self.binary_len;
            tracing::debug!(
                size = payload.len(),
                text_len,
                "mixed frame complete"
            );
            self.sink.mixed(MixedMessage {
                data: payload,
                text_len,
            });
        }
    }

    fn resync(&mut self, reason: &'static str) {
        tracing::debug!(reason, state = ?self.state, "malformed header; resynchronizing");
        self.reset();
    }

    fn trace_symbol(&self, symbol: u8) {
        if self.config.verbose {
            tracing::trace!(state = ?self.state, symbol = %symbol.escape_ascii(), "parse");
        }
    }
}

fn fold_digit(acc: usize, digit: u8) -> Option<usize> {
    acc.checked_mul(10)?.checked_add(usize::from(digit - b'0'))
}
