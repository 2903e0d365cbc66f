//! Decode frames flowing through an in-process pipe.
//!
//! A producer thread writes plain and mixed frames to one end of a Unix
//! socket pair; the main thread pumps the other end through a decoder while a
//! consumer thread drains each output queue.
//!
//! Run with:
//!   cargo run --example pipe-decode

use std::thread;

use netstring::frame::{Decoder, FrameReader, FrameWriter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (left, right) = std::os::unix::net::UnixStream::pair()?;

    let producer = thread::spawn(move || -> netstring::frame::Result<()> {
        let mut writer = FrameWriter::new(left);
        for i in 0..5 {
            writer.send(format!("message {i}").as_bytes())?;
        }
        writer.send_mixed(b"image/png", &[0x89, 0x50, 0x4e, 0x47])?;
        Ok(())
    });

    let (decoder, output) = Decoder::new();
    let plain_consumer = thread::spawn(move || {
        for payload in output.plain {
            eprintln!("plain: {}", String::from_utf8_lossy(&payload));
        }
    });
    let mixed_consumer = thread::spawn(move || {
        for message in output.mixed {
            eprintln!(
                "mixed: text={} binary={} bytes",
                String::from_utf8_lossy(message.text()),
                message.binary_len()
            );
        }
    });

    let mut reader = FrameReader::new(right, decoder);
    let total = reader.run()?;
    drop(reader);

    producer.join().expect("producer thread")?;
    plain_consumer.join().expect("plain consumer thread");
    mixed_consumer.join().expect("mixed consumer thread");
    eprintln!("decoded {total} bytes");
    Ok(())
}
