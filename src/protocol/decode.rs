//! Incremental decoding of the response body into lines.
//!
//! Chunk boundaries are arbitrary: a multi-byte character or a line may be
//! split across any number of chunks. Both decoders keep the unfinished tail
//! and complete it with the next chunk.

use std::borrow::Cow;

const REPLACEMENT: char = '\u{FFFD}';

/// Stateful UTF-8 decoder.
///
/// Invalid sequences become U+FFFD. An incomplete sequence at the end of a
/// chunk is held back until more bytes arrive.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `chunk` (plus held-back bytes) as is complete.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let bytes: Cow<'_, [u8]> = if self.pending.is_empty() {
            Cow::Borrowed(chunk)
        } else {
            let mut joined = std::mem::take(&mut self.pending);
            joined.extend_from_slice(chunk);
            Cow::Owned(joined)
        };

        let mut out = String::with_capacity(bytes.len());
        let mut input: &[u8] = &bytes;
        loop {
            match std::str::from_utf8(input) {
                Ok(text) => {
                    out.push_str(text);
                    break;
                }
                Err(e) => {
                    let (valid, rest) = input.split_at(e.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match e.error_len() {
                        Some(bad) => {
                            out.push(REPLACEMENT);
                            input = &rest[bad..];
                        }
                        None => {
                            self.pending = rest.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Flush at end of input. A dangling partial sequence becomes U+FFFD.
    pub fn finish(&mut self) -> Option<char> {
        if self.pending.is_empty() {
            None
        } else {
            self.pending.clear();
            Some(REPLACEMENT)
        }
    }
}

/// Splits a byte stream into `\n`-terminated lines.
///
/// A trailing `\r` is stripped from each line. The final unterminated line is
/// only released by [`LineDecoder::finish`].
#[derive(Debug, Default)]
pub struct LineDecoder {
    utf8: Utf8Decoder,
    partial: String,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every line it completes, in order.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<String> {
        let text = self.utf8.decode(chunk);
        self.partial.push_str(&text);

        let mut lines = Vec::new();
        while let Some(idx) = self.partial.find('\n') {
            let mut line: String = self.partial.drain(..=idx).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
            lines.push(line);
        }
        lines
    }

    /// Release whatever is left once the body has ended.
    pub fn finish(&mut self) -> Option<String> {
        if let Some(c) = self.utf8.finish() {
            self.partial.push(c);
        }
        if self.partial.is_empty() {
            return None;
        }
        let mut line = std::mem::take(&mut self.partial);
        if line.ends_with('\r') {
            line.pop();
        }
        Some(line)
    }
}
