use std::fs::File;
use std::io::Read;
use std::thread::{self, JoinHandle};

use netstring_frame::{Decoder, DecoderOutput, FrameConfig, FrameReader, Message};

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let input: Box<dyn Read> = match &args.file {
        Some(path) => Box::new(
            File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?,
        ),
        None => Box::new(std::io::stdin()),
    };

    let config = FrameConfig {
        end_symbol: args.end_symbol,
        queue_capacity: args.queue_capacity,
        verbose: args.verbose,
        max_payload_size: args.max_payload,
        ..FrameConfig::default()
    };
    let (decoder, output) = Decoder::with_config(config);
    let (plain_consumer, mixed_consumer) = spawn_consumers(output, format);

    let mut reader = FrameReader::with_chunk_size(input, decoder, args.chunk_size);
    let result = reader.run();
    // Dropping the decoder closes both queues so the consumers finish draining.
    drop(reader);

    let plain = join_consumer(plain_consumer)?;
    let mixed = join_consumer(mixed_consumer)?;
    let total = result.map_err(|err| frame_error("decode failed", err))?;

    tracing::info!(bytes = total, plain, mixed, "decode complete");
    Ok(SUCCESS)
}

fn spawn_consumers(
    output: DecoderOutput,
    format: OutputFormat,
) -> (JoinHandle<usize>, JoinHandle<usize>) {
    let DecoderOutput { plain, mixed } = output;

    let plain_consumer = thread::spawn(move || {
        let mut printed = 0usize;
        for payload in plain {
            print_message(&Message::Plain(payload), format);
            printed += 1;
        }
        printed
    });
    let mixed_consumer = thread::spawn(move || {
        let mut printed = 0usize;
        for message in mixed {
            print_message(&Message::Mixed(message), format);
            printed += 1;
        }
        printed
    });

    (plain_consumer, mixed_consumer)
}

fn join_consumer(handle: JoinHandle<usize>) -> CliResult<usize> {
    handle
        .join()
        .map_err(|_| CliError::new(INTERNAL, "output consumer panicked"))
}
