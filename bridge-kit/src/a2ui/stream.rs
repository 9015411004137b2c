//! Stream framing for A2UI transports.
//!
//! The processor only ever sees whole messages. This module turns the
//! transport's byte stream into those messages:
//! - SSE: `data:` lines hold the JSON payload, `:` lines are comments
//!   (keep-alive pings) and an empty line ends an event
//! - JSONL: one message (or one array of messages) per line, arriving in
//!   arbitrary chunks
//! - JSON: one document holding a message or an array of messages

use std::io::BufRead;

use serde_json::Value;

use super::error::{BridgeError, Result};
use super::message::Message;

/// SSE event parsed from stream
#[derive(Debug, Clone, PartialEq)]
pub enum SseEvent {
    /// Data event with JSON payload
    Data(String),
    /// Comment (keep-alive)
    Comment(String),
}

/// SSE parser state
#[derive(Debug, Default)]
pub struct SseParser {
    data_buffer: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a single line from SSE stream.
    /// Returns `Some(event)` when a complete event is ready.
    pub fn parse_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = line.trim_end_matches('\r');
        if let Some(data) = line.strip_prefix("data:") {
            self.data_buffer.push(data.trim().to_string());
            None
        } else if let Some(comment) = line.strip_prefix(':') {
            Some(SseEvent::Comment(comment.trim().to_string()))
        } else if line.is_empty() {
            self.flush()
        } else {
            // event:, id:, retry: and unknown fields carry nothing we use
            None
        }
    }

    /// Flush any remaining data
    pub fn flush(&mut self) -> Option<SseEvent> {
        if self.data_buffer.is_empty() {
            return None;
        }
        let data = self.data_buffer.join("\n");
        self.data_buffer.clear();
        Some(SseEvent::Data(data))
    }
}

/// Decode one JSON payload holding a message or an array of messages.
///
/// A malformed payload is a single error. Inside an array each element is
/// decoded on its own, so one bad element does not hide the others.
pub fn decode_payload(payload: &[u8]) -> Vec<Result<Message>> {
    match serde_json::from_slice::<Value>(payload) {
        Ok(Value::Array(items)) => items.into_iter().map(Message::from_value).collect(),
        Ok(value) => vec![Message::from_value(value)],
        Err(e) => vec![Err(BridgeError::Parse(e))],
    }
}

/// Incremental decoder for newline-delimited message streams.
///
/// Chunks may split a message (or a UTF-8 sequence) anywhere; nothing is
/// decoded until its terminating newline arrives.
#[derive(Debug, Default)]
pub struct MessageStreamDecoder {
    buffer: Vec<u8>,
}

impl MessageStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk. Returns every message completed by it, in order.
    pub fn push(&mut self, chunk: impl AsRef<[u8]>) -> Vec<Result<Message>> {
        self.buffer.extend_from_slice(chunk.as_ref());

        let mut decoded = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            decoded.extend(Self::decode_line(&line));
        }
        decoded
    }

    /// Decode whatever is left once the stream has ended.
    pub fn finish(&mut self) -> Vec<Result<Message>> {
        let rest = std::mem::take(&mut self.buffer);
        Self::decode_line(&rest)
    }

    /// Bytes received but not yet decoded
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    fn decode_line(line: &[u8]) -> Vec<Result<Message>> {
        if line.iter().all(u8::is_ascii_whitespace) {
            return Vec::new();
        }
        decode_payload(line)
    }
}

/// Framing of a message stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFormat {
    /// A single JSON document
    Json,
    /// Newline-delimited JSON
    Jsonl,
    /// Server-sent events
    Sse,
}

impl StreamFormat {
    /// Guess the framing from the start of a stream
    pub fn detect(sample: &str) -> Self {
        let first_line = sample
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default();

        if first_line.starts_with("data:")
            || first_line.starts_with("event:")
            || first_line.starts_with(':')
        {
            StreamFormat::Sse
        } else if serde_json::from_str::<Value>(first_line).is_ok() {
            StreamFormat::Jsonl
        } else {
            StreamFormat::Json
        }
    }
}

/// Read messages from `reader` until it ends.
///
/// Every decoded item is handed to `on_item`; returning `false` from it
/// stops reading. Read failures are reported as [`BridgeError::Io`] and
/// end the stream.
pub fn read_messages<R, F>(mut reader: R, format: StreamFormat, mut on_item: F)
where
    R: BufRead,
    F: FnMut(Result<Message>) -> bool,
{
    match format {
        StreamFormat::Json => {
            let mut text = Vec::new();
            if let Err(e) = reader.read_to_end(&mut text) {
                on_item(Err(e.into()));
                return;
            }
            for item in decode_payload(&text) {
                if !on_item(item) {
                    return;
                }
            }
        }
        StreamFormat::Jsonl => {
            let mut decoder = MessageStreamDecoder::new();
            let mut chunk = [0u8; 8192];
            loop {
                let read = match reader.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => n,
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        on_item(Err(e.into()));
                        return;
                    }
                };
                for item in decoder.push(&chunk[..read]) {
                    if !on_item(item) {
                        return;
                    }
                }
            }
            for item in decoder.finish() {
                if !on_item(item) {
                    return;
                }
            }
        }
        StreamFormat::Sse => {
            let mut parser = SseParser::new();
            for line in reader.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        on_item(Err(e.into()));
                        return;
                    }
                };
                if !deliver_sse(parser.parse_line(&line), &mut on_item) {
                    return;
                }
            }
            deliver_sse(parser.flush(), &mut on_item);
        }
    }
}

fn deliver_sse<F>(event: Option<SseEvent>, on_item: &mut F) -> bool
where
    F: FnMut(Result<Message>) -> bool,
{
    match event {
        Some(SseEvent::Data(data)) => decode_payload(data.as_bytes()).into_iter().all(on_item),
        Some(SseEvent::Comment(comment)) => {
            log::trace!("[A2UI stream] SSE comment: {}", comment);
            true
        }
        None => true,
    }
}
