//! Incremental netstring framing.
//!
//! A plain frame is `<len>:<payload>,`. A mixed frame carries a text segment
//! followed by a raw binary segment: `<textLen>,<binLen>:<text><binary>,`.
//!
//! The [`Decoder`] is a byte-at-a-time state machine: feed it chunks of any
//! size and it publishes completed messages to a [`FrameSink`]. Malformed
//! input is skipped, never reported.

#[cfg(feature = "async")]
pub mod async_codec;
pub mod codec;
pub mod config;
pub mod decoder;
pub mod error;
pub mod message;
pub mod reader;
pub mod sink;
pub mod writer;

#[cfg(feature = "async")]
pub use async_codec::NetstringCodec;
pub use codec::{
    encode, encode_frame, encode_mixed, encode_mixed_frame, DEFAULT_END_SYMBOL,
    DEFAULT_LENGTH_SEPARATOR, DEFAULT_SEPARATOR,
};
pub use config::{FrameConfig, DEFAULT_QUEUE_CAPACITY};
pub use decoder::{Decoder, ParseState};
pub use error::{FrameError, Result};
pub use message::{Message, MixedMessage};
pub use reader::FrameReader;
pub use sink::{ChannelSink, DecoderOutput, FrameSink};
pub use writer::FrameWriter;
