use super::{DisplaySurface, Paragraph};
use std::io::Write;

/// Surface that prints each paragraph as one line.
///
/// Write failures are logged and otherwise ignored; the paragraph still
/// counts as displayed.
pub struct TerminalSurface<W: Write> {
    out: W,
    appended: usize,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out, appended: 0 }
    }

    /// Number of paragraphs appended so far.
    pub fn appended(&self) -> usize {
        self.appended
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn append(&mut self, paragraph: Paragraph) {
        self.appended += 1;

        let written = writeln!(self.out, "{}", paragraph.text()).and_then(|_| self.out.flush());
        if let Err(e) = written {
            tracing::warn!(error = %e, "failed to write paragraph to terminal");
        }
    }
}
