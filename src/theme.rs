use std::collections::HashMap;

/// Marker positions a theme can fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    OpenDeletedLine,
    CloseDeletedLine,
    OpenDeletedModified,
    CloseDeletedModified,
    OpenDeletedNotModified,
    CloseDeletedNotModified,
    OpenInsertedLine,
    CloseInsertedLine,
    OpenInsertedModified,
    CloseInsertedModified,
    OpenInsertedNotModified,
    CloseInsertedNotModified,
    OpenKeepLine,
    CloseKeepLine,
    OpenSection,
    CloseSection,
    OpenHeader,
    CloseHeader,
}

const RESET: &str = "\x1b[0m";

/// Marker strings wrapped around the parts of a rendered diff.
/// Tags that were never set render as nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Theme {
    markers: HashMap<Tag, String>,
}

impl Theme {
    /// No markers at all, not even line breaks.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Classic unified diff text.
    pub fn plain() -> Self {
        Self::empty()
            .with(Tag::CloseDeletedLine, "\n")
            .with(Tag::CloseInsertedLine, "\n")
            .with(Tag::CloseKeepLine, "\n")
            .with(Tag::CloseSection, "\n")
            .with(Tag::CloseHeader, "\n")
    }

    /// ANSI terminal colors: red and green lines, changed fragments on a
    /// colored background, cyan section headers.
    pub fn ansi() -> Self {
        Self::plain()
            .with(Tag::OpenDeletedModified, "\x1b[30;41m")
            .with(Tag::CloseDeletedModified, RESET)
            .with(Tag::OpenDeletedNotModified, "\x1b[31m")
            .with(Tag::CloseDeletedNotModified, RESET)
            .with(Tag::OpenInsertedModified, "\x1b[30;42m")
            .with(Tag::CloseInsertedModified, RESET)
            .with(Tag::OpenInsertedNotModified, "\x1b[32m")
            .with(Tag::CloseInsertedNotModified, RESET)
            .with(Tag::OpenSection, "\x1b[36m")
            .with(Tag::CloseSection, "\x1b[0m\n")
            .with(Tag::OpenHeader, "\x1b[1m")
            .with(Tag::CloseHeader, "\x1b[0m\n")
    }

    /// Inline-styled HTML. Fragment text is emitted verbatim.
    pub fn html() -> Self {
        Self::empty()
            .with(Tag::OpenDeletedLine, r#"<div style="background-color: #ffecec;">"#)
            .with(Tag::CloseDeletedLine, "</div>")
            .with(Tag::OpenDeletedModified, r#"<span style="background-color: #f8cbcb;">"#)
            .with(Tag::CloseDeletedModified, "</span>")
            .with(Tag::OpenInsertedLine, r#"<div style="background-color: #eaffea;">"#)
            .with(Tag::CloseInsertedLine, "</div>")
            .with(Tag::OpenInsertedModified, r#"<span style="background-color: #a6f3a6;">"#)
            .with(Tag::CloseInsertedModified, "</span>")
            .with(Tag::OpenKeepLine, r#"<div style="background-color: #ffffff;">"#)
            .with(Tag::CloseKeepLine, "</div>")
            .with(Tag::OpenSection, r#"<div style="background-color: #f1f8ff; color: #586069;">"#)
            .with(Tag::CloseSection, "</div>")
            .with(Tag::OpenHeader, r#"<div style="font-weight: bold;">"#)
            .with(Tag::CloseHeader, "</div>")
    }

    pub fn with(mut self, tag: Tag, marker: impl Into<String>) -> Self {
        self.markers.insert(tag, marker.into());
        self
    }

    pub fn get(&self, tag: Tag) -> &str {
        self.markers.get(&tag).map(String::as_str).unwrap_or("")
    }
}
