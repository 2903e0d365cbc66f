//! `tokio_util::codec` integration.
//!
//! Wraps the same state machine as [`Decoder`](crate::Decoder) behind a
//! [`VecDeque`] sink so frames can be pulled one at a time by `FramedRead`.

use std::collections::VecDeque;

use bytes::{Bytes, BytesMut};
use tokio_util::codec;

use crate::codec::{encode_frame, encode_mixed_frame};
use crate::config::FrameConfig;
use crate::decoder::Decoder;
use crate::error::FrameError;
use crate::message::Message;

/// Netstring codec for `Framed`, `FramedRead` and `FramedWrite`.
#[derive(Debug)]
pub struct NetstringCodec {
    decoder: Decoder<VecDeque<Message>>,
}

impl NetstringCodec {
    pub fn new() -> Self {
        Self::with_config(FrameConfig::default())
    }

    pub fn with_config(config: FrameConfig) -> Self {
        Self {
            decoder: Decoder::with_sink(VecDeque::new(), config),
        }
    }

    pub fn config(&self) -> &FrameConfig {
        self.decoder.config()
    }

    fn encode_limit(&self, size: usize) -> Result<(), FrameError> {
        match self.config().max_payload_size {
            Some(max) if size > max => Err(FrameError::PayloadTooLarge { size, max }),
            _ => Ok(()),
        }
    }
}

impl Default for NetstringCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl codec::Decoder for NetstringCodec {
    type Item = Message;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(message) = self.decoder.sink_mut().pop_front() {
            return Ok(Some(message));
        }
        if src.is_empty() {
            return Ok(None);
        }

        let chunk = src.split();
        self.decoder.feed(&chunk);
        Ok(self.decoder.sink_mut().pop_front())
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(message) = self.decode(src)? {
            return Ok(Some(message));
        }
        if self.decoder.is_idle() {
            Ok(None)
        } else {
            self.decoder.reset();
            Err(FrameError::ConnectionClosed)
        }
    }
}

/// Mixed messages with an empty binary segment are decoded back as
/// [`Message::Plain`]. A mixed message whose `text_len` exceeds its data is
/// rejected with [`FrameError::InvalidTextLength`].
impl codec::Encoder<Message> for NetstringCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let end_symbol = self.config().end_symbol;
        match item {
            Message::Plain(payload) => {
                self.encode_limit(payload.len())?;
                encode_frame(&payload, end_symbol, dst);
            }
            Message::Mixed(mixed) => {
                mixed.validate()?;
                self.encode_limit(mixed.data.len())?;
                encode_mixed_frame(mixed.text(), mixed.binary(), end_symbol, dst);
            }
        }
        Ok(())
    }
}

impl codec::Encoder<Bytes> for NetstringCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.encode_limit(item.len())?;
        encode_frame(&item, self.config().end_symbol, dst);
        Ok(())
    }
}
