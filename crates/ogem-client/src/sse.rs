//! Line-oriented `data: <json>` event streams

use std::fmt::Display;
use std::pin::Pin;

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::error::{OgemError, Result};
use crate::types::ChatCompletionChunk;

const DATA_PREFIX: &str = "data: ";
const DONE: &str = "[DONE]";

/// Meaning of one line of an event stream
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Data(&'a str),
    Done,
    Other,
}

fn classify(line: &str) -> Line<'_> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    match line.strip_prefix(DATA_PREFIX) {
        Some(data) if data.trim() == DONE => Line::Done,
        Some(data) => Line::Data(data),
        None => Line::Other,
    }
}

/// Bytes received but not yet split into lines
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
    }

    fn next_line(&mut self) -> Option<String> {
        let end = self.pending.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.pending.drain(..=end).collect();

        Some(String::from_utf8_lossy(&line[..end]).into_owned())
    }

    /// Unterminated last line, if any
    fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }

        let line = std::mem::take(&mut self.pending);
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

struct State<S> {
    bytes: Pin<Box<S>>,
    buffer: LineBuffer,
    finished: bool,
}

/// Payloads of the `data:` lines of a byte stream, up to `[DONE]`
pub fn data_lines<S, E>(bytes: S) -> impl Stream<Item = Result<String>> + Send
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
    E: Display,
{
    let state = State {
        bytes: Box::pin(bytes),
        buffer: LineBuffer::default(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        while !state.finished {
            if let Some(line) = state.buffer.next_line() {
                match classify(&line) {
                    Line::Data(data) => {
                        let data = data.to_owned();
                        return Some((Ok(data), state));
                    }
                    Line::Done => state.finished = true,
                    Line::Other => {}
                }
                continue;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => state.buffer.push(&chunk),
                Some(Err(e)) => {
                    state.finished = true;
                    return Some((Err(OgemError::Stream(e.to_string())), state));
                }
                None => {
                    state.finished = true;
                    let line = state.buffer.finish()?;
                    if let Line::Data(data) = classify(&line) {
                        let data = data.to_owned();
                        return Some((Ok(data), state));
                    }
                }
            }
        }

        None
    })
}

pub fn parse_chunk(data: &str) -> Result<ChatCompletionChunk> {
    serde_json::from_str(data).map_err(|e| OgemError::Stream(format!("failed to parse stream chunk: {e}")))
}

/// Chat completion chunks of an event stream
pub fn chat_chunks<S, E>(bytes: S) -> impl Stream<Item = Result<ChatCompletionChunk>> + Send
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
    E: Display,
{
    data_lines(bytes).map(|line| line.and_then(|data| parse_chunk(&data)))
}

/// Blocking counterpart of [`data_lines`]
#[cfg(feature = "blocking")]
pub struct DataLines<R> {
    reader: R,
    finished: bool,
}

#[cfg(feature = "blocking")]
impl<R: std::io::BufRead> DataLines<R> {
    pub const fn new(reader: R) -> Self {
        Self { reader, finished: false }
    }
}

#[cfg(feature = "blocking")]
impl<R: std::io::BufRead> Iterator for DataLines<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut raw = Vec::new();

        while !self.finished {
            raw.clear();
            match self.reader.read_until(b'\n', &mut raw) {
                Ok(0) => self.finished = true,
                Ok(_) => {
                    let line = String::from_utf8_lossy(raw.strip_suffix(b"\n").unwrap_or(&raw)).into_owned();
                    match classify(&line) {
                        Line::Data(data) => return Some(Ok(data.to_owned())),
                        Line::Done => self.finished = true,
                        Line::Other => {}
                    }
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(OgemError::Stream(e.to_string())));
                }
            }
        }

        None
    }
}
