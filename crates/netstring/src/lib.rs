//! Streaming netstring codec.
//!
//! Decodes `<len>:<payload>,` frames, plus a mixed variant
//! `<textLen>,<binLen>:<text><binary>,`, from byte chunks of any size.
//!
//! # Crate Structure
//!
//! - [`frame`] — Decoder state machine, encoder, output sinks and I/O adapters
//!
//! # Example
//!
//! ```
//! use netstring::frame::{encode, Decoder};
//!
//! let (mut decoder, output) = Decoder::new();
//! decoder.feed(&encode(b"hello"));
//! assert_eq!(output.plain.recv().unwrap().as_ref(), b"hello");
//! ```

/// Re-export frame types.
pub mod frame {
    pub use netstring_frame::*;
}
