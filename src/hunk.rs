use crate::align::Operation;
use crate::diff::Line;

/// Inclusive range of line indices rendered as one unified-diff section.
/// Only built by [`group`], so it always lies inside the lines it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hunk {
    start: usize,
    end: usize,
}

impl Hunk {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// The hunk's lines. `lines` must be the slice passed to [`group`].
    pub fn lines<'a>(&self, lines: &'a [Line]) -> &'a [Line] {
        &lines[self.start..=self.end]
    }

    /// `@@ -a[,b] +c[,d] @@` for this hunk.
    pub fn section_header(&self, lines: &[Line]) -> String {
        let lines = self.lines(lines);
        let first_old = lines.iter().find_map(|l| l.old_line);
        let first_new = lines.iter().find_map(|l| l.new_line);
        let last_old = lines.iter().rev().find_map(|l| l.old_line);
        let last_new = lines.iter().rev().find_map(|l| l.new_line);
        format!(
            "@@ -{} +{} @@",
            render_range(first_old, last_old),
            render_range(first_new, last_new)
        )
    }
}

fn render_range(first: Option<usize>, last: Option<usize>) -> String {
    match (first, last) {
        (Some(first), Some(last)) if last > first => format!("{first},{}", last - first + 1),
        (Some(first), _) => first.to_string(),
        _ => "0".to_string(),
    }
}

/// Groups changed lines into hunks padded with `context` lines on each side,
/// merging hunks whose padding touches or overlaps.
pub fn group(lines: &[Line], context: usize) -> Vec<Hunk> {
    let Some(last_index) = lines.len().checked_sub(1) else {
        return Vec::new();
    };

    let mut regions = Vec::new();
    let mut open: Option<usize> = None;
    for (i, line) in lines.iter().enumerate() {
        match (open, line.op) {
            (Some(start), Operation::Keep) => {
                regions.push(padded(start, i - 1, context, last_index));
                open = None;
            }
            (None, op) if op != Operation::Keep => open = Some(i),
            _ => {}
        }
    }
    if let Some(start) = open {
        regions.push(padded(start, last_index, context, last_index));
    }

    let mut hunks: Vec<Hunk> = Vec::with_capacity(regions.len());
    for region in regions {
        match hunks.last_mut() {
            Some(prev) if region.start <= prev.end => prev.end = prev.end.max(region.end),
            _ => hunks.push(region),
        }
    }
    hunks
}

fn padded(start: usize, end: usize, context: usize, last_index: usize) -> Hunk {
    Hunk {
        start: start.saturating_sub(context),
        end: end.saturating_add(context).min(last_index),
    }
}
