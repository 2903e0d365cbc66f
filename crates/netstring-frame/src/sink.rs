//! Output sinks for completed frames.
//!
//! The decoder hands every completed frame to a [`FrameSink`]. The default
//! [`ChannelSink`] publishes to two bounded queues and blocks the feeding
//! thread while a queue is full.

use std::collections::VecDeque;
use bytes::Bytes;
use crossbeam::channel::{self, Receiver, Sender};

use crate::message::{Message, MixedMessage};

/// Receives completed frames from a decoder.
pub trait FrameSink {
    /// Publish a plain frame payload.
    fn plain(&mut self, payload: Bytes);

    /// Publish a mixed text/binary frame.
    fn mixed(&mut self, message: MixedMessage);
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn plain(&mut self, payload: Bytes) {
        (**self).plain(payload);
    }

    fn mixed(&mut self, message: MixedMessage) {
        (**self).mixed(message);
    }
}

/// Unbounded in-process queue preserving completion order across both kinds.
impl FrameSink for VecDeque<Message> {
    fn plain(&mut self, payload: Bytes) {
        self.push_back(Message::Plain(payload));
    }

    fn mixed(&mut self, message: MixedMessage) {
        self.push_back(Message::Mixed(message));
    }
}

/// Bounded, blocking sink backed by two independent queues.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    plain: Sender<Bytes>,
    mixed: Sender<MixedMessage>,
}

/// Consumer half of a [`ChannelSink`].
///
/// Each queue yields messages in completion order. Both report disconnection
/// once the decoder owning the sink is dropped.
#[derive(Debug)]
pub struct DecoderOutput {
    /// Plain frame payloads.
    pub plain: Receiver<Bytes>,
    /// Mixed text/binary frames.
    pub mixed: Receiver<MixedMessage>,
}

impl ChannelSink {
    /// Create a sink whose queues each hold up to `capacity` messages.
    pub fn bounded(capacity: usize) -> (Self, DecoderOutput) {
        let (plain_tx, plain_rx) = channel::bounded(capacity);
        let (mixed_tx, mixed_rx) = channel::bounded(capacity);
        (
            Self {
                plain: plain_tx,
                mixed: mixed_tx,
            },
            DecoderOutput {
                plain: plain_rx,
                mixed: mixed_rx,
            },
        )
    }
}

impl FrameSink for ChannelSink {
    fn plain(&mut self, payload: Bytes) {
        let size = payload.len();
        if self.plain.send(payload).is_err() {
            tracing::warn!(size, "plain consumer disconnected; message discarded");
        }
    }

    fn mixed(&mut self, message: MixedMessage) {
        let size = message.data.len();
        if self.mixed.send(message).is_err() {
            tracing::warn!(size, "mixed consumer disconnected; message discarded");
        }
    }
}

impl DecoderOutput {
    /// Drain everything currently queued without blocking.
    pub fn drain(&self) -> (Vec<Bytes>, Vec<MixedMessage>) {
        (
            self.plain.try_iter().collect(),
            self.mixed.try_iter().collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use crossbeam::channel::TryRecvError;

    use super::*;

    #[test]
    fn queues_are_fifo() {
        let (mut sink, output) = ChannelSink::bounded(4);
        sink.plain(Bytes::from_static(b"one"));
        sink.plain(Bytes::from_static(b"two"));
        sink.mixed(MixedMessage::new(&b"ab"[..], 1));

        assert_eq!(output.plain.recv().unwrap().as_ref(), b"one");
        assert_eq!(output.plain.recv().unwrap().as_ref(), b"two");
        assert_eq!(output.mixed.recv().unwrap().text(), b"a");
        assert!(matches!(output.plain.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn full_plain_queue_does_not_block_mixed() {
        let (mut sink, output) = ChannelSink::bounded(1);
        sink.plain(Bytes::from_static(b"fills-plain"));
        sink.mixed(MixedMessage::new(&b"xy"[..], 1));

        let (plain, mixed) = output.drain();
        assert_eq!(plain.len(), 1);
        assert_eq!(mixed.len(), 1);
    }

    #[test]
    fn hung_up_consumer_discards_silently() {
        let (mut sink, output) = ChannelSink::bounded(1);
        drop(output);

        sink.plain(Bytes::from_static(b"lost"));
        sink.mixed(MixedMessage::new(&b"lost"[..], 2));
    }

    #[test]
    fn dropping_sink_disconnects_output() {
        let (sink, output) = ChannelSink::bounded(1);
        drop(sink);
        assert!(matches!(
            output.plain.try_recv(),
            Err(TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn vecdeque_keeps_cross_kind_order() {
        let mut queue: VecDeque<Message> = VecDeque::new();
        queue.plain(Bytes::from_static(b"p"));
        queue.mixed(MixedMessage::new(&b"m"[..], 1));
        queue.plain(Bytes::from_static(b"q"));

        let kinds: Vec<bool> = queue.iter().map(Message::is_mixed).collect();
        assert_eq!(kinds, vec![false, true, false]);
    }
}
