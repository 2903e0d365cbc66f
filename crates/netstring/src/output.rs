use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use netstring_frame::Message;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    kind: &'a str,
    size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_len: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    binary_len: Option<usize>,
    payload: String,
}

impl<'a> MessageOutput<'a> {
    fn from_message(message: &'a Message) -> Self {
        match message {
            Message::Plain(payload) => Self {
                kind: "plain",
                size: payload.len(),
                text_len: None,
                binary_len: None,
                payload: payload_preview(payload),
            },
            Message::Mixed(mixed) => Self {
                kind: "mixed",
                size: mixed.data.len(),
                text_len: Some(mixed.text_len),
                binary_len: Some(mixed.binary_len()),
                payload: payload_preview(mixed.text()),
            },
        }
    }
}

pub fn print_message(message: &Message, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", render_json(message));
        }
        OutputFormat::Table => {
            let out = MessageOutput::from_message(message);
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KIND", "SIZE", "TEXT", "BINARY", "PAYLOAD"])
                .add_row(vec![
                    out.kind.to_string(),
                    out.size.to_string(),
                    optional(out.text_len),
                    optional(out.binary_len),
                    out.payload,
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let out = MessageOutput::from_message(message);
            match (out.text_len, out.binary_len) {
                (Some(text_len), Some(binary_len)) => println!(
                    "kind={} size={} text={} binary={} payload={}",
                    out.kind, out.size, text_len, binary_len, out.payload
                ),
                _ => println!("kind={} size={} payload={}", out.kind, out.size, out.payload),
            }
        }
        OutputFormat::Raw => {
            print_raw(message.payload());
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout().lock();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn render_json(message: &Message) -> String {
    serde_json::to_string(&MessageOutput::from_message(message))
        .unwrap_or_else(|_| "{}".to_string())
}

fn optional(value: Option<usize>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", payload.len()),
    }
}
