//! Markdown report rendering
//!
//! Consumers parse these reports by their `#`/`##`/`###` headers, `- `
//! bullets and `[[name]]` references, so those prefixes are fixed.

use std::fmt::Write;

/// `[[name]]` reference markup
pub fn page_ref(name: &str) -> String {
    format!("[[{name}]]")
}

/// Accumulates a markdown document section by section.
#[derive(Debug, Default)]
pub struct Markdown {
    buf: String,
}

impl Markdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn h1(&mut self, title: impl AsRef<str>) -> &mut Self {
        self.heading(1, title.as_ref())
    }

    pub fn h2(&mut self, title: impl AsRef<str>) -> &mut Self {
        self.heading(2, title.as_ref())
    }

    pub fn h3(&mut self, title: impl AsRef<str>) -> &mut Self {
        self.heading(3, title.as_ref())
    }

    pub fn bullet(&mut self, text: impl AsRef<str>) -> &mut Self {
        let _ = writeln!(self.buf, "- {}", text.as_ref());
        self
    }

    /// A paragraph line followed by a blank line.
    pub fn para(&mut self, text: impl AsRef<str>) -> &mut Self {
        let _ = writeln!(self.buf, "{}\n", text.as_ref());
        self
    }

    /// Pre-rendered text appended verbatim.
    pub fn raw(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.buf.push_str(text.as_ref());
        if !self.buf.ends_with('\n') {
            self.buf.push('\n');
        }
        self
    }

    pub fn finish(self) -> String {
        self.buf.trim_end().to_string() + "\n"
    }

    fn heading(&mut self, level: usize, title: &str) -> &mut Self {
        if !self.buf.is_empty() && !self.buf.ends_with("\n\n") {
            self.buf.push('\n');
        }
        let _ = writeln!(self.buf, "{} {}\n", "#".repeat(level), title);
        self
    }
}

/// `0.75` as `75%`
pub fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}
