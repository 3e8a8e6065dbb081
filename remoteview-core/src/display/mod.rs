mod html;
mod terminal;

pub use html::escape_text;
pub use terminal::TerminalSurface;

/// One rendered message. The text is the received payload, unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    text: String,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The container messages are rendered into.
///
/// Appending is the only mutation a surface supports: paragraphs are never
/// removed, reordered or edited once appended.
pub trait DisplaySurface {
    fn append(&mut self, paragraph: Paragraph);
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for &mut S {
    fn append(&mut self, paragraph: Paragraph) {
        (**self).append(paragraph);
    }
}

/// Shows every paragraph on both surfaces, first `A` then `B`.
impl<A: DisplaySurface, B: DisplaySurface> DisplaySurface for (A, B) {
    fn append(&mut self, paragraph: Paragraph) {
        self.0.append(paragraph.clone());
        self.1.append(paragraph);
    }
}

/// In-memory, append-only display list.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    paragraphs: Vec<Paragraph>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Texts of all paragraphs, in display order.
    pub fn texts(&self) -> Vec<&str> {
        self.paragraphs.iter().map(Paragraph::text).collect()
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Render the list as the `#messages` container of a page.
    pub fn render_html(&self) -> String {
        html::render_container(&self.paragraphs)
    }

    /// Render a complete page whose body is the `#messages` container.
    pub fn render_page(&self) -> String {
        html::render_page(&self.render_html())
    }
}

impl DisplaySurface for DisplayList {
    fn append(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }
}
