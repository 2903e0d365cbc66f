use std::fs;
use std::io::Read;

use netstring_frame::{FrameConfig, FrameWriter};

use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};

pub fn run(args: EncodeArgs) -> CliResult<i32> {
    let payload = resolve_payload(&args)?;
    let binary = match &args.binary {
        Some(path) => Some(
            fs::read(path)
                .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?,
        ),
        None => None,
    };

    let config = FrameConfig::with_end_symbol(args.end_symbol);
    let mut writer = FrameWriter::with_config(std::io::stdout().lock(), config);

    let sent = match &binary {
        Some(binary) => writer.send_mixed(&payload, binary),
        None => writer.send(&payload),
    };
    sent.map_err(|err| frame_error("write failed", err))?;

    tracing::debug!(
        size = payload.len(),
        binary = ?binary.as_ref().map(Vec::len),
        "frame encoded"
    );
    Ok(SUCCESS)
}

fn resolve_payload(args: &EncodeArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }

    let mut payload = Vec::new();
    std::io::stdin()
        .read_to_end(&mut payload)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(payload)
}
