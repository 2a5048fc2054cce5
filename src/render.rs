use tracing::{debug, trace};

use crate::align::Operation;
use crate::diff::{DiffResult, Line};
use crate::hunk::{group, Hunk};
use crate::theme::{Tag, Theme};

struct SideTags {
    open_line: Tag,
    close_line: Tag,
    open_modified: Tag,
    close_modified: Tag,
    open_plain: Tag,
    close_plain: Tag,
    prefix: &'static str,
}

const DELETED: SideTags = SideTags {
    open_line: Tag::OpenDeletedLine,
    close_line: Tag::CloseDeletedLine,
    open_modified: Tag::OpenDeletedModified,
    close_modified: Tag::CloseDeletedModified,
    open_plain: Tag::OpenDeletedNotModified,
    close_plain: Tag::CloseDeletedNotModified,
    prefix: "-",
};

const INSERTED: SideTags = SideTags {
    open_line: Tag::OpenInsertedLine,
    close_line: Tag::CloseInsertedLine,
    open_modified: Tag::OpenInsertedModified,
    close_modified: Tag::CloseInsertedModified,
    open_plain: Tag::OpenInsertedNotModified,
    close_plain: Tag::CloseInsertedNotModified,
    prefix: "+",
};

fn write_changed_line(out: &mut String, line: &Line, tags: &SideTags, theme: &Theme) {
    out.push_str(theme.get(tags.open_line));
    out.push_str(theme.get(tags.open_plain));
    out.push_str(tags.prefix);
    out.push_str(theme.get(tags.close_plain));
    for fragment in &line.fragments {
        let (open, close) = if fragment.changed {
            (tags.open_modified, tags.close_modified)
        } else {
            (tags.open_plain, tags.close_plain)
        };
        out.push_str(theme.get(open));
        out.push_str(&fragment.text);
        out.push_str(theme.get(close));
    }
    out.push_str(theme.get(tags.close_line));
}

/// Appends themed lines to `out`.
pub fn write_lines(out: &mut String, lines: &[Line], theme: &Theme) {
    for line in lines {
        match line.op {
            Operation::Delete => write_changed_line(out, line, &DELETED, theme),
            Operation::Insert => write_changed_line(out, line, &INSERTED, theme),
            Operation::Keep => {
                out.push_str(theme.get(Tag::OpenKeepLine));
                out.push(' ');
                for fragment in &line.fragments {
                    out.push_str(&fragment.text);
                }
                out.push_str(theme.get(Tag::CloseKeepLine));
            }
        }
    }
}

/// Appends one hunk, section header first.
pub fn write_hunk(out: &mut String, hunk: &Hunk, lines: &[Line], theme: &Theme) {
    trace!(start = hunk.start(), end = hunk.end(), "writing hunk");
    out.push_str(theme.get(Tag::OpenSection));
    out.push_str(&hunk.section_header(lines));
    out.push_str(theme.get(Tag::CloseSection));
    write_lines(out, hunk.lines(lines), theme);
}

impl DiffResult {
    /// Every line, themed, without grouping.
    pub fn format(&self, theme: &Theme) -> String {
        let mut out = String::new();
        write_lines(&mut out, &self.lines, theme);
        out
    }

    pub fn hunks(&self, context: usize) -> Vec<Hunk> {
        group(&self.lines, context)
    }

    /// Unified diff with file headers and `context` lines around each change.
    pub fn unified(&self, old_title: &str, new_title: &str, context: usize, theme: &Theme) -> String {
        let mut out = String::new();
        for header in [format!("--- {old_title}"), format!("+++ {new_title}")] {
            out.push_str(theme.get(Tag::OpenHeader));
            out.push_str(&header);
            out.push_str(theme.get(Tag::CloseHeader));
        }

        let hunks = self.hunks(context);
        debug!(hunks = hunks.len(), context, "rendering unified diff");
        for hunk in &hunks {
            write_hunk(&mut out, hunk, &self.lines, theme);
        }
        out
    }
}
