use std::io::{ErrorKind, Read};

use crate::decoder::Decoder;
use crate::error::{FrameError, Result};
use crate::sink::FrameSink;

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Pumps bytes from any `Read` stream into a [`Decoder`].
///
/// Completed frames go to the decoder's sink; the reader only moves bytes.
pub struct FrameReader<T, S> {
    inner: T,
    decoder: Decoder<S>,
    chunk: Vec<u8>,
}

impl<T: Read, S: FrameSink> FrameReader<T, S> {
    /// Create a reader with the default chunk size.
    pub fn new(inner: T, decoder: Decoder<S>) -> Self {
        Self::with_chunk_size(inner, decoder, READ_CHUNK_SIZE)
    }

    /// Create a reader that reads at most `chunk_size` bytes per call.
    pub fn with_chunk_size(inner: T, decoder: Decoder<S>, chunk_size: usize) -> Self {
        Self {
            inner,
            decoder,
            chunk: vec![0u8; chunk_size.max(1)],
        }
    }

    /// Read one chunk and feed it to the decoder (blocking).
    ///
    /// Returns the number of bytes fed; `0` means EOF.
    pub fn pump(&mut self) -> Result<usize> {
        loop {
            match self.inner.read(&mut self.chunk) {
                Ok(n) => {
                    self.decoder.feed(&self.chunk[..n]);
                    return Ok(n);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Pump until EOF and return the total number of bytes fed.
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` if the stream ends in the
    /// middle of a frame.
    pub fn run(&mut self) -> Result<u64> {
        let mut total = 0u64;
        loop {
            let read = self.pump()?;
            if read == 0 {
                break;
            }
            total += read as u64;
        }

        if !self.decoder.is_idle() {
            tracing::debug!(total, state = ?self.decoder.state(), "stream ended mid-frame");
            return Err(FrameError::ConnectionClosed);
        }
        Ok(total)
    }

    /// Borrow the decoder.
    pub fn decoder(&self) -> &Decoder<S> {
        &self.decoder
    }

    /// Mutably borrow the decoder.
    pub fn decoder_mut(&mut self) -> &mut Decoder<S> {
        &mut self.decoder
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the stream and decoder.
    pub fn into_parts(self) -> (T, Decoder<S>) {
        (self.inner, self.decoder)
    }
}
