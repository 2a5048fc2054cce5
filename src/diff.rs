use std::fmt;

use tracing::debug;

use crate::align::{Aligner, MyersAligner, Operation};
use crate::block::{assemble, BlockDiff};
use crate::refine::refine;

/// How finely changed lines are broken down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    /// Whole lines only.
    Line,
    /// Paired lines also carry character-level change fragments.
    #[default]
    Word,
}

/// Smallest rendered unit of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub changed: bool,
}

impl Fragment {
    pub fn new(text: impl Into<String>, changed: bool) -> Self {
        Fragment {
            text: text.into(),
            changed,
        }
    }
}

/// One row of the diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub op: Operation,
    pub old_line: Option<usize>,
    pub new_line: Option<usize>,
    pub fragments: Vec<Fragment>,
}

impl Line {
    /// Full text of the line, without terminator.
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }
}

/// Full diff, top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    pub lines: Vec<Line>,
}

impl DiffResult {
    pub fn has_changes(&self) -> bool {
        self.lines.iter().any(|l| l.op != Operation::Keep)
    }
}

impl fmt::Display for DiffResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            let prefix = match line.op {
                Operation::Insert => "+ ",
                Operation::Delete => "- ",
                Operation::Keep => "  ",
            };
            writeln!(f, "{prefix}{}", line.text())?;
        }
        Ok(())
    }
}

/// Diffs two documents with the default Myers aligner.
pub fn diff(old_text: &str, new_text: &str, granularity: Granularity) -> DiffResult {
    diff_with(&MyersAligner, old_text, new_text, granularity)
}

pub fn diff_with<A: Aligner>(
    aligner: &A,
    old_text: &str,
    new_text: &str,
    granularity: Granularity,
) -> DiffResult {
    let blocks = assemble(aligner, old_text, new_text);
    let result = match granularity {
        Granularity::Line => expand_lines(&blocks),
        Granularity::Word => refine(aligner, &blocks),
    };
    debug!(
        ?granularity,
        blocks = blocks.len(),
        lines = result.lines.len(),
        "computed diff"
    );
    result
}

/// One line per physical line of every block, each a single unchanged fragment.
pub fn expand_lines(blocks: &[BlockDiff]) -> DiffResult {
    let mut lines = Vec::new();
    for block in blocks {
        expand_block(block, false, &mut lines);
    }
    DiffResult { lines }
}

pub(crate) fn expand_block(block: &BlockDiff, changed: bool, out: &mut Vec<Line>) {
    for (i, text) in block.lines().enumerate() {
        out.push(Line {
            op: block.op,
            old_line: block.old_line.map(|n| n + i),
            new_line: block.new_line.map(|n| n + i),
            fragments: vec![Fragment::new(text, changed)],
        });
    }
}
