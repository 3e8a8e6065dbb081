use super::Stat;

/// Encode a stat as one line of JSON terminated by `'\n'`.
pub fn encode_line(stat: &Stat) -> Result<String, serde_json::Error> {
    let mut line = serde_json::to_string(stat)?;
    line.push('\n');
    Ok(line)
}

/// Splits a byte stream into `'\n'` terminated lines.
///
/// Chunks may cut lines (and UTF-8 sequences) anywhere. Complete lines are
/// returned in arrival order without their terminator; the trailing partial
/// line is kept until a later chunk completes it. Invalid UTF-8 inside a
/// line is replaced with U+FFFD, so only valid text comes out unchanged.
///
/// Without a maximum the partial line grows for as long as no `'\n'`
/// arrives; see [`LineDecoder::with_max_line`].
#[derive(Debug, Default)]
pub struct LineDecoder {
    pending: Vec<u8>,
    max_line: Option<usize>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A decoder that reports [`overflowed`](Self::overflowed) once more than
    /// `max_line` bytes of an unterminated line are buffered.
    pub fn with_max_line(max_line: usize) -> Self {
        Self {
            pending: Vec::new(),
            max_line: Some(max_line),
        }
    }

    /// Append a chunk and drain every line it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut consumed = 0;

        while let Some(offset) = self.pending[consumed..].iter().position(|b| *b == b'\n') {
            let end = consumed + offset;
            lines.push(String::from_utf8_lossy(&self.pending[consumed..end]).into_owned());
            consumed = end + 1;
        }

        self.pending.drain(..consumed);
        lines
    }

    /// Bytes received after the last complete line.
    pub fn remaining(&self) -> &[u8] {
        &self.pending
    }

    pub fn overflowed(&self) -> bool {
        self.max_line.is_some_and(|max| self.pending.len() > max)
    }
}
