use tracing::trace;

use crate::align::{Aligner, Operation};

/// One aligned run of whole lines with the line numbers it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDiff {
    pub op: Operation,
    pub text: String,
    pub old_line: Option<usize>,
    pub new_line: Option<usize>,
}

impl BlockDiff {
    /// The physical lines of the block without their terminators.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        physical_lines(&self.text)
    }
}

/// Splits text into lines, each keeping its trailing `\n`. A final line
/// without a terminator is returned as is.
pub fn tokenize_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Lines of `text` with terminators stripped, without the empty element a
/// trailing `\n` would otherwise produce.
pub fn physical_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive('\n')
        .map(|line| line.strip_suffix('\n').unwrap_or(line))
}

pub(crate) fn terminator_count(text: &str) -> usize {
    text.bytes().filter(|b| *b == b'\n').count()
}

/// Aligns two documents line by line and numbers the resulting blocks.
pub fn assemble<A: Aligner>(aligner: &A, old_text: &str, new_text: &str) -> Vec<BlockDiff> {
    let old_lines = tokenize_lines(old_text);
    let new_lines = tokenize_lines(new_text);
    let runs = aligner.align(&old_lines, &new_lines);

    let mut old_counter = 1;
    let mut new_counter = 1;
    let mut blocks = Vec::with_capacity(runs.len());

    for run in runs {
        let text = match run.op {
            Operation::Insert => new_lines[run.new].concat(),
            Operation::Delete | Operation::Keep => old_lines[run.old].concat(),
        };
        let advance = terminator_count(&text);
        let (old_line, new_line) = match run.op {
            Operation::Insert => {
                let start = new_counter;
                new_counter += advance;
                (None, Some(start))
            }
            Operation::Delete => {
                let start = old_counter;
                old_counter += advance;
                (Some(start), None)
            }
            Operation::Keep => {
                let starts = (Some(old_counter), Some(new_counter));
                old_counter += advance;
                new_counter += advance;
                starts
            }
        };
        blocks.push(BlockDiff {
            op: run.op,
            text,
            old_line,
            new_line,
        });
    }

    trace!(blocks = blocks.len(), "assembled line blocks");
    blocks
}
