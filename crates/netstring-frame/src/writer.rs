use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_frame, encode_mixed_frame};
use crate::config::FrameConfig;
use crate::error::{FrameError, Result};
use crate::message::Message;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes complete netstring frames to any `Write` stream.
///
/// Frames are terminated with `config.end_symbol`.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Encode and send a plain frame.
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.check_size(payload.len())?;

        self.buf.clear();
        encode_frame(payload, self.config.end_symbol, &mut self.buf);
        self.write_buffered()
    }

    /// Encode and send a mixed text/binary frame.
    pub fn send_mixed(&mut self, text: &[u8], binary: &[u8]) -> Result<()> {
        self.check_size(text.len().saturating_add(binary.len()))?;

        self.buf.clear();
        encode_mixed_frame(text, binary, self.config.end_symbol, &mut self.buf);
        self.write_buffered()
    }

    /// Send a message as a plain or mixed frame.
    ///
    /// A mixed message with an empty binary segment decodes as plain on the
    /// other side.
    pub fn write_message(&mut self, message: &Message) -> Result<()> {
        match message {
            Message::Plain(payload) => self.send(payload),
            Message::Mixed(mixed) => {
                mixed.validate()?;
                self.send_mixed(mixed.text(), mixed.binary())
            }
        }
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    fn check_size(&self, size: usize) -> Result<()> {
        match self.config.max_payload_size {
            Some(max) if size > max => Err(FrameError::PayloadTooLarge { size, max }),
            _ => Ok(()),
        }
    }

    fn write_buffered(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::decoder::Decoder;
    use crate::message::MixedMessage;

    fn written(writer: FrameWriter<Cursor<Vec<u8>>>) -> Vec<u8> {
        writer.into_inner().into_inner()
    }

    fn decode_all(wire: &[u8], config: FrameConfig) -> Vec<Message> {
        let mut decoder = Decoder::with_sink(VecDeque::<Message>::new(), config);
        decoder.feed(wire);
        decoder.into_sink().into()
    }

    #[test]
    fn write_single_frame() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(b"hello").unwrap();
        assert_eq!(written(writer), b"5:hello,");
    }

    #[test]
    fn write_multiple_frames() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(b"one").unwrap();
        writer.send(b"two").unwrap();
        writer.send_mixed(b"three", &[0x00, 0xFF]).unwrap();

        let messages = decode_all(&written(writer), FrameConfig::default());
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].payload().as_ref(), b"one");
        assert_eq!(messages[1].payload().as_ref(), b"two");
        assert_eq!(
            messages[2],
            Message::Mixed(MixedMessage::new(&b"three\x00\xff"[..], 5))
        );
    }

    #[test]
    fn uses_configured_terminator() {
        let config = FrameConfig::with_end_symbol(b';');
        let mut writer = FrameWriter::with_config(Cursor::new(Vec::<u8>::new()), config.clone());
        writer.send(b"hello").unwrap();
        writer.send(b"world!").unwrap();

        let wire = written(writer);
        assert_eq!(wire, b"5:hello;6:world!;");
        assert_eq!(decode_all(&wire, config).len(), 2);
    }

    #[test]
    fn write_message_preserves_kind() {
        let messages = vec![
            Message::Plain(bytes::Bytes::from_static(b"plain")),
            Message::Mixed(MixedMessage::new(&b"txtbin"[..], 3)),
        ];
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        for message in &messages {
            writer.write_message(message).unwrap();
        }

        assert_eq!(
            decode_all(&written(writer), FrameConfig::default()),
            messages
        );
    }

    #[test]
    fn write_message_rejects_text_len_past_data() {
        let message = Message::Mixed(MixedMessage {
            data: bytes::Bytes::from_static(b"ab"),
            text_len: 5,
        });
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));

        let err = writer.write_message(&message).unwrap_err();
        assert!(matches!(
            err,
            FrameError::InvalidTextLength {
                text_len: 5,
                size: 2
            }
        ));
        assert!(written(writer).is_empty());
    }

    #[test]
    fn mixed_without_binary_reads_back_plain() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer
            .write_message(&Message::Mixed(MixedMessage::new(&b"text"[..], 4)))
            .unwrap();

        let wire = written(writer);
        assert_eq!(wire, b"4,0:text,");
        assert_eq!(
            decode_all(&wire, FrameConfig::default()),
            vec![Message::Plain(bytes::Bytes::from_static(b"text"))]
        );
    }

    #[test]
    fn payload_too_large_rejected() {
        let cfg = FrameConfig {
            max_payload_size: Some(4),
            ..FrameConfig::default()
        };
        let mut writer = FrameWriter::with_config(Cursor::new(Vec::<u8>::new()), cfg);

        let err = writer.send(b"oversized").unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { size: 9, max: 4 }));

        let err = writer.send_mixed(b"abc", b"de").unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { size: 5, .. }));
        assert!(written(writer).is_empty());
    }

    #[test]
    fn flush_propagates() {
        let sink = FlushTrackingWriter::default();
        let flag = Arc::clone(&sink.flushed);
        let mut writer = FrameWriter::new(sink);

        writer.send(b"x").unwrap();

        assert!(flag.load(Ordering::SeqCst));
        assert_eq!(writer.get_ref().data, b"1:x,");
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));

        let _ = writer.get_ref();
        let _ = writer.get_mut();
        assert_eq!(writer.config().end_symbol, b',');
        let _inner = writer.into_inner();
    }

    #[test]
    fn handles_interrupted_and_would_block() {
        for kind in [ErrorKind::Interrupted, ErrorKind::WouldBlock] {
            let writer_impl = FailOnceWriter {
                kind,
                wrote_once: false,
                flushed_once: false,
                data: Vec::new(),
            };

            let mut writer = FrameWriter::new(writer_impl);
            writer.send(b"retry").unwrap();

            assert_eq!(writer.into_inner().data, b"5:retry,");
        }
    }

    #[test]
    fn connection_closed_when_write_returns_zero() {
        let mut writer = FrameWriter::new(ZeroWriter);
        let err = writer.send(b"x").unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        flushed: Arc<AtomicBool>,
        data: Vec<u8>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailOnceWriter {
        kind: ErrorKind,
        wrote_once: bool,
        flushed_once: bool,
        data: Vec<u8>,
    }

    impl Write for FailOnceWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.wrote_once {
                self.wrote_once = true;
                return Err(std::io::Error::from(self.kind));
            }
            // Short writes exercise the offset loop.
            let n = buf.len().min(2);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            if !self.flushed_once {
                self.flushed_once = true;
                return Err(std::io::Error::from(self.kind));
            }
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
