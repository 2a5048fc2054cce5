use std::mem;

use tracing::trace;

use crate::align::{Aligner, Operation};
use crate::block::BlockDiff;
use crate::diff::{expand_block, DiffResult, Fragment, Line};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Scanning,
    Paired,
}

/// Expands blocks into lines, refining every Delete block that is directly
/// followed by an Insert block into character-level fragments.
///
/// An Insert followed by a Delete is left alone, as are unpaired blocks: their
/// lines are emitted whole and flagged changed unless they are kept.
pub fn refine<A: Aligner>(aligner: &A, blocks: &[BlockDiff]) -> DiffResult {
    let mut lines = Vec::new();
    let mut state = State::Scanning;
    let mut cursor = 0;
    let mut pairs = 0;

    while cursor < blocks.len() {
        match state {
            State::Scanning => {
                let block = &blocks[cursor];
                let next_is_insert = blocks
                    .get(cursor + 1)
                    .is_some_and(|next| next.op == Operation::Insert);
                if block.op == Operation::Delete && next_is_insert {
                    state = State::Paired;
                } else {
                    expand_block(block, block.op != Operation::Keep, &mut lines);
                    cursor += 1;
                }
            }
            State::Paired => {
                refine_pair(aligner, &blocks[cursor], &blocks[cursor + 1], &mut lines);
                pairs += 1;
                cursor += 2;
                state = State::Scanning;
            }
        }
    }

    trace!(pairs, "refined delete/insert pairs");
    DiffResult { lines }
}

fn refine_pair<A: Aligner>(
    aligner: &A,
    deleted: &BlockDiff,
    inserted: &BlockDiff,
    out: &mut Vec<Line>,
) {
    let old_chars: Vec<char> = deleted.text.chars().collect();
    let new_chars: Vec<char> = inserted.text.chars().collect();

    let mut pieces: Vec<(Operation, String)> = Vec::new();
    for run in aligner.align(&old_chars, &new_chars) {
        let text: String = match run.op {
            Operation::Insert => new_chars[run.new].iter().collect(),
            Operation::Delete | Operation::Keep => old_chars[run.old].iter().collect(),
        };
        pieces.extend(
            text.split_inclusive('\n')
                .map(|piece| (run.op, piece.to_string())),
        );
    }

    out.extend(family_lines(&pieces, Operation::Delete, deleted.old_line));
    out.extend(family_lines(&pieces, Operation::Insert, inserted.new_line));
}

/// Rebuilds the lines of one side from newline-split pieces. Pieces of the
/// other side are skipped, including their newlines.
fn family_lines(pieces: &[(Operation, String)], side: Operation, start: Option<usize>) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut fragments = Vec::new();
    let mut number = start;

    let mut emit = |fragments: Vec<Fragment>, number: Option<usize>| {
        let (old_line, new_line) = match side {
            Operation::Delete => (number, None),
            _ => (None, number),
        };
        lines.push(Line {
            op: side,
            old_line,
            new_line,
            fragments,
        });
    };

    for (op, piece) in pieces {
        if *op != Operation::Keep && *op != side {
            continue;
        }
        let (body, ends_line) = match piece.strip_suffix('\n') {
            Some(body) => (body, true),
            None => (piece.as_str(), false),
        };
        if !body.is_empty() {
            fragments.push(Fragment::new(body, *op != Operation::Keep));
        }
        if ends_line {
            emit(mem::take(&mut fragments), number);
            number = number.map(|n| n + 1);
        }
    }
    // unterminated last line
    if !fragments.is_empty() {
        emit(fragments, number);
    }

    lines
}

#[cfg(test)]
mod tests {
    use std::hash::Hash;

    use super::*;
    use crate::align::{MyersAligner, Run};
    use crate::diff::{diff, diff_with, Granularity};

    fn dump(result: &DiffResult) -> String {
        let mut out = String::new();
        for line in &result.lines {
            out.push_str(match line.op {
                Operation::Insert => "+ ",
                Operation::Delete => "- ",
                Operation::Keep => "  ",
            });
            for fragment in &line.fragments {
                if fragment.changed {
                    out.push('[');
                    out.push_str(&fragment.text);
                    out.push(']');
                } else {
                    out.push_str(&fragment.text);
                }
            }
            out.push('\n');
        }
        out
    }

    fn block(op: Operation, text: &str, old_line: Option<usize>, new_line: Option<usize>) -> BlockDiff {
        BlockDiff {
            op,
            text: text.to_string(),
            old_line,
            new_line,
        }
    }

    /// Never finds anything in common.
    struct WholesaleAligner;

    impl Aligner for WholesaleAligner {
        fn align<T: Eq + Hash + Ord>(&self, old: &[T], new: &[T]) -> Vec<Run> {
            let mut runs = Vec::new();
            if !old.is_empty() {
                runs.push(Run::delete(0..old.len(), 0));
            }
            if !new.is_empty() {
                runs.push(Run::insert(old.len(), 0..new.len()));
            }
            runs
        }
    }

    #[test]
    fn single_changed_character() {
        let result = diff("abc\ndef\n", "abc\ndeg\n", Granularity::Word);
        assert_eq!(dump(&result), "  abc\n- de[f]\n+ de[g]\n");
        assert_eq!(result.lines[1].fragments, vec![Fragment::new("de", false), Fragment::new("f", true)]);
        assert_eq!(result.lines[2].fragments, vec![Fragment::new("de", false), Fragment::new("g", true)]);
    }

    #[test]
    fn multi_line_blocks_emit_old_family_first() {
        let result = diff("abc\ndef\nghi\n", "abc\ndeg\nghj\n", Granularity::Word);
        assert_eq!(dump(&result), "  abc\n- de[f]\n- gh[i]\n+ de[g]\n+ gh[j]\n");

        let numbers: Vec<_> = result.lines.iter().map(|l| (l.old_line, l.new_line)).collect();
        assert_eq!(
            numbers,
            vec![
                (Some(1), Some(1)),
                (Some(2), None),
                (Some(3), None),
                (None, Some(2)),
                (None, Some(3)),
            ]
        );
    }

    #[test]
    fn unpaired_blocks_are_marked_changed() {
        let result = diff("abc\ndef\n", "abc\n", Granularity::Word);
        assert_eq!(dump(&result), "  abc\n- [def]\n");
    }

    #[test]
    fn insert_before_delete_is_not_refined() {
        let blocks = vec![
            block(Operation::Insert, "abd\n", None, Some(1)),
            block(Operation::Delete, "abc\n", Some(1), None),
        ];
        let result = refine(&MyersAligner, &blocks);
        assert_eq!(dump(&result), "+ [abd]\n- [abc]\n");
    }

    #[test]
    fn inserted_newline_splits_only_the_new_side() {
        let blocks = vec![
            block(Operation::Delete, "abc\n", Some(4), None),
            block(Operation::Insert, "ab\nc\n", None, Some(7)),
        ];
        let result = refine(&MyersAligner, &blocks);
        let texts: Vec<_> = result.lines.iter().map(|l| (l.op, l.text())).collect();
        assert_eq!(
            texts,
            vec![
                (Operation::Delete, "abc".to_string()),
                (Operation::Insert, "ab".to_string()),
                (Operation::Insert, "c".to_string()),
            ]
        );
        assert_eq!(result.lines[0].old_line, Some(4));
        assert_eq!(result.lines[1].new_line, Some(7));
        assert_eq!(result.lines[2].new_line, Some(8));
    }

    #[test]
    fn unterminated_pair_is_flushed() {
        let result = diff("x\nabc", "x\nabd", Granularity::Word);
        assert_eq!(dump(&result), "  x\n- ab[c]\n+ ab[d]\n");
    }

    #[test]
    fn fake_aligner_marks_whole_lines() {
        let result = diff_with(&WholesaleAligner, "abc\n", "abd\n", Granularity::Word);
        assert_eq!(dump(&result), "- [abc]\n+ [abd]\n");
    }

    #[test]
    fn fragments_rebuild_each_side() {
        let old = "fn main() {\n    println!(\"hello\");\n}\n\nlet x = 1;\n";
        let new = "fn main() {\n    println!(\"world\");\n    return;\n}\n\nlet x = 2;";
        let result = diff(old, new, Granularity::Word);

        let old_side: Vec<String> = result
            .lines
            .iter()
            .filter(|l| l.op != Operation::Insert)
            .map(Line::text)
            .collect();
        let new_side: Vec<String> = result
            .lines
            .iter()
            .filter(|l| l.op != Operation::Delete)
            .map(Line::text)
            .collect();
        assert_eq!(old_side, old.lines().collect::<Vec<_>>());
        assert_eq!(new_side, new.lines().collect::<Vec<_>>());
    }
}
