use std::fmt;
use std::hash::Hash;
use std::ops::Range;

use similar::{capture_diff_slices, Algorithm, DiffTag};

/// What happened to a run of tokens between the old and the new sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Delete,
    Insert,
    Keep,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Delete => "@Delete",
            Operation::Insert => "@Insert",
            Operation::Keep => "@Keep",
        };
        f.write_str(name)
    }
}

/// One contiguous aligned run. `old` and `new` index into the two input
/// sequences; a Delete has an empty `new` range, an Insert an empty `old` range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub op: Operation,
    pub old: Range<usize>,
    pub new: Range<usize>,
}

impl Run {
    pub fn keep(old: Range<usize>, new: Range<usize>) -> Self {
        Run { op: Operation::Keep, old, new }
    }

    pub fn delete(old: Range<usize>, at_new: usize) -> Self {
        Run { op: Operation::Delete, old, new: at_new..at_new }
    }

    pub fn insert(at_old: usize, new: Range<usize>) -> Self {
        Run { op: Operation::Insert, old: at_old..at_old, new }
    }

    fn is_empty(&self) -> bool {
        self.old.is_empty() && self.new.is_empty()
    }
}

/// Sequence alignment over opaque tokens.
///
/// Implementations must return runs in order, covering both inputs exactly
/// once, with no empty runs and no two adjacent runs sharing an operation.
pub trait Aligner {
    fn align<T: Eq + Hash + Ord>(&self, old: &[T], new: &[T]) -> Vec<Run>;
}

/// Myers diff backed by `similar`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MyersAligner;

impl Aligner for MyersAligner {
    fn align<T: Eq + Hash + Ord>(&self, old: &[T], new: &[T]) -> Vec<Run> {
        let mut runs = Vec::new();
        for op in capture_diff_slices(Algorithm::Myers, old, new) {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            match tag {
                DiffTag::Equal => push_run(&mut runs, Run::keep(old_range, new_range)),
                DiffTag::Delete => push_run(&mut runs, Run::delete(old_range, new_range.start)),
                DiffTag::Insert => push_run(&mut runs, Run::insert(old_range.start, new_range)),
                DiffTag::Replace => {
                    push_run(&mut runs, Run::delete(old_range.clone(), new_range.start));
                    push_run(&mut runs, Run::insert(old_range.end, new_range));
                }
            }
        }
        runs
    }
}

/// Appends `run`, dropping it when empty and coalescing it with the previous
/// run when both carry the same operation.
pub fn push_run(runs: &mut Vec<Run>, run: Run) {
    if run.is_empty() {
        return;
    }
    if let Some(last) = runs.last_mut() {
        if last.op == run.op && last.old.end == run.old.start && last.new.end == run.new.start {
            last.old.end = run.old.end;
            last.new.end = run.new.end;
            return;
        }
    }
    runs.push(run);
}
