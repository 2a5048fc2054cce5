//
// lib.rs
// WordDiff-rs
//
// Library entry: line/word diff pipeline (alignment, block numbering, word refinement, hunk grouping, themed rendering) plus the CLI plumbing used by the binary.
//
// Thales Matheus Mendonça Santos - November 2025
//
// Public crate interface: re-export modules used by the binary and tests.
pub mod align;
pub mod block;
pub mod cli;
pub mod compare;
pub mod diff;
pub mod hunk;
pub mod refine;
pub mod render;
pub mod scanner;
pub mod theme;
pub mod utils;

pub use align::{Aligner, MyersAligner, Operation, Run};
pub use block::{assemble, BlockDiff};
pub use cli::{build_options, Args, Options};
pub use compare::{run_compare, Counters, Report};
pub use diff::{diff, diff_with, DiffResult, Fragment, Granularity, Line};
pub use hunk::{group, Hunk};
pub use theme::{Tag, Theme};
