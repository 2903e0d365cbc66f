use bytes::{BufMut, Bytes, BytesMut};

/// Separator between the length header and the payload.
pub const DEFAULT_SEPARATOR: u8 = b':';

/// Separator between the text length and the binary length of a mixed frame.
pub const DEFAULT_LENGTH_SEPARATOR: u8 = b',';

/// Frame terminator.
pub const DEFAULT_END_SYMBOL: u8 = b',';

/// Encode a payload as a plain netstring.
///
/// Wire format:
/// ```text
/// ┌──────────────────┬─────┬─────────────────┬─────┐
/// │ Length (decimal) │ ':' │ Payload         │ ',' │
/// │ ASCII digits     │     │ (Length bytes)  │     │
/// └──────────────────┴─────┴─────────────────┴─────┘
/// ```
///
/// Only plain frames are produced here; see [`encode_mixed`] for the
/// text/binary variant.
pub fn encode(payload: &[u8]) -> Bytes {
    let mut dst = BytesMut::new();
    encode_frame(payload, DEFAULT_END_SYMBOL, &mut dst);
    dst.freeze()
}

/// Append a plain frame with an explicit terminator to `dst`.
pub fn encode_frame(payload: &[u8], end_symbol: u8, dst: &mut BytesMut) {
    let length = payload.len().to_string();
    dst.reserve(length.len() + payload.len() + 2);
    dst.put_slice(length.as_bytes());
    dst.put_u8(DEFAULT_SEPARATOR);
    dst.put_slice(payload);
    dst.put_u8(end_symbol);
}

/// Encode a mixed text/binary frame.
///
/// Wire format: `<textLen> ',' <binLen> ':' <text><binary> ','`. The decoder
/// recovers the split point from `binLen`.
pub fn encode_mixed(text: &[u8], binary: &[u8]) -> Bytes {
    let mut dst = BytesMut::new();
    encode_mixed_frame(text, binary, DEFAULT_END_SYMBOL, &mut dst);
    dst.freeze()
}

/// Append a mixed frame with an explicit terminator to `dst`.
///
/// An empty `binary` segment yields a header the decoder reads back as a plain
/// frame, since a zero binary length is indistinguishable from none.
pub fn encode_mixed_frame(text: &[u8], binary: &[u8], end_symbol: u8, dst: &mut BytesMut) {
    let text_len = text.len().to_string();
    let binary_len = binary.len().to_string();
    dst.reserve(text_len.len() + binary_len.len() + text.len() + binary.len() + 3);
    dst.put_slice(text_len.as_bytes());
    dst.put_u8(DEFAULT_LENGTH_SEPARATOR);
    dst.put_slice(binary_len.as_bytes());
    dst.put_u8(DEFAULT_SEPARATOR);
    dst.put_slice(text);
    dst.put_slice(binary);
    dst.put_u8(end_symbol);
}
