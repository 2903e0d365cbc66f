use bytes::Bytes;

use crate::error::{FrameError, Result};

/// A completed mixed frame: text bytes immediately followed by binary bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixedMessage {
    /// Text segment followed by the binary segment.
    pub data: Bytes,
    /// Length of the leading text segment.
    pub text_len: usize,
}

impl MixedMessage {
    /// `text_len` is clamped to the length of `data`.
    pub fn new(data: impl Into<Bytes>, text_len: usize) -> Self {
        let data = data.into();
        let text_len = text_len.min(data.len());
        Self { data, text_len }
    }

    /// The leading text segment.
    pub fn text(&self) -> &[u8] {
        self.split().0
    }

    /// The trailing binary segment.
    pub fn binary(&self) -> &[u8] {
        self.split().1
    }

    /// Length of the binary segment.
    pub fn binary_len(&self) -> usize {
        self.data.len().saturating_sub(self.text_len)
    }

    /// Check that `text_len` lies within `data`. The fields are public, so a
    /// hand-built message can violate this.
    pub fn validate(&self) -> Result<()> {
        if self.text_len > self.data.len() {
            return Err(FrameError::InvalidTextLength {
                text_len: self.text_len,
                size: self.data.len(),
            });
        }
        Ok(())
    }

    fn split(&self) -> (&[u8], &[u8]) {
        self.data.split_at(self.text_len.min(self.data.len()))
    }
}

/// Either kind of completed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Plain(Bytes),
    Mixed(MixedMessage),
}

impl Message {
    /// Full payload bytes as they appeared on the wire.
    pub fn payload(&self) -> &Bytes {
        match self {
            Message::Plain(payload) => payload,
            Message::Mixed(mixed) => &mixed.data,
        }
    }

    pub fn is_mixed(&self) -> bool {
        matches!(self, Message::Mixed(_))
    }
}

impl From<MixedMessage> for Message {
    fn from(mixed: MixedMessage) -> Self {
        Message::Mixed(mixed)
    }
}
