//! Word-level sequence alignment.
//!
//! Produces difflib-style opcodes from a longest-common-subsequence table.
//! Shared prefix and suffix are trimmed before the table is built, so the
//! quadratic part only covers the region that actually changed.

use std::ops::Range;

/// Above this many table cells the changed middle is reported as a single
/// replace instead of being aligned word by word.
pub const MAX_ALIGNMENT_CELLS: usize = 4_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub old: Range<usize>,
    pub new: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Equal,
    Delete,
    Insert,
}

#[derive(Default)]
struct OpcodeBuilder {
    ops: Vec<Opcode>,
    i: usize,
    j: usize,
}

impl OpcodeBuilder {
    fn push(&mut self, step: Step) {
        let (di, dj) = match step {
            Step::Equal => (1, 1),
            Step::Delete => (1, 0),
            Step::Insert => (0, 1),
        };
        let is_equal = step == Step::Equal;

        match self.ops.last_mut() {
            Some(last) if (last.tag == OpTag::Equal) == is_equal => {
                last.old.end += di;
                last.new.end += dj;
            }
            _ => self.ops.push(Opcode {
                tag: if is_equal { OpTag::Equal } else { OpTag::Replace },
                old: self.i..self.i + di,
                new: self.j..self.j + dj,
            }),
        }

        self.i += di;
        self.j += dj;
    }

    fn push_run(&mut self, step: Step, count: usize) {
        for _ in 0..count {
            self.push(step);
        }
    }

    fn finish(mut self) -> Vec<Opcode> {
        for op in &mut self.ops {
            if op.tag != OpTag::Equal {
                op.tag = match (op.old.is_empty(), op.new.is_empty()) {
                    (false, true) => OpTag::Delete,
                    (true, false) => OpTag::Insert,
                    _ => OpTag::Replace,
                };
            }
        }
        self.ops
    }
}

/// Aligns `old` against `new` and returns the edit script as ordered opcodes.
///
/// Each non-equal opcode covers one maximal contiguous edit region; a region
/// touching both sides is tagged `Replace`.
pub fn opcodes<T: PartialEq>(old: &[T], new: &[T]) -> Vec<Opcode> {
    let prefix = old
        .iter()
        .zip(new)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let mut builder = OpcodeBuilder::default();
    builder.push_run(Step::Equal, prefix);
    align_middle(old_mid, new_mid, &mut builder);
    builder.push_run(Step::Equal, suffix);
    builder.finish()
}

fn align_middle<T: PartialEq>(old: &[T], new: &[T], builder: &mut OpcodeBuilder) {
    let (n, m) = (old.len(), new.len());
    if n == 0 || m == 0 || (n + 1).saturating_mul(m + 1) > MAX_ALIGNMENT_CELLS {
        builder.push_run(Step::Delete, n);
        builder.push_run(Step::Insert, m);
        return;
    }

    // lcs[i * width + j] = LCS length of old[i..] and new[j..]
    let width = m + 1;
    let mut lcs = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i * width + j] = if old[i] == new[j] {
                lcs[(i + 1) * width + j + 1] + 1
            } else {
                lcs[(i + 1) * width + j].max(lcs[i * width + j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            builder.push(Step::Equal);
            i += 1;
            j += 1;
        } else if lcs[(i + 1) * width + j] >= lcs[i * width + j + 1] {
            builder.push(Step::Delete);
            i += 1;
        } else {
            builder.push(Step::Insert);
            j += 1;
        }
    }
    builder.push_run(Step::Delete, n - i);
    builder.push_run(Step::Insert, m - j);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<&str> {
        text.split_whitespace().collect()
    }

    fn tags(ops: &[Opcode]) -> Vec<OpTag> {
        ops.iter().map(|op| op.tag).collect()
    }

    #[test]
    fn test_identical_sequences_are_one_equal_run() {
        let a = words("the paper is under review");
        let ops = opcodes(&a, &a);
        assert_eq!(
            ops,
            vec![Opcode {
                tag: OpTag::Equal,
                old: 0..5,
                new: 0..5
            }]
        );
    }

    #[test]
    fn test_empty_inputs() {
        let empty: Vec<&str> = Vec::new();
        assert!(opcodes(&empty, &empty).is_empty());

        let b = words("brand new page");
        let ops = opcodes(&empty, &b);
        assert_eq!(tags(&ops), vec![OpTag::Insert]);
        assert_eq!(ops[0].new, 0..3);
    }

    #[test]
    fn test_insert_in_middle() {
        let a = words("one two five");
        let b = words("one two three four five");
        let ops = opcodes(&a, &b);
        assert_eq!(tags(&ops), vec![OpTag::Equal, OpTag::Insert, OpTag::Equal]);
        assert_eq!(ops[1].old, 2..2);
        assert_eq!(ops[1].new, 2..4);
    }

    #[test]
    fn test_delete_and_replace_regions() {
        let a = words("alpha beta gamma delta epsilon");
        let b = words("alpha gamma DELTA epsilon");
        let ops = opcodes(&a, &b);
        assert_eq!(
            tags(&ops),
            vec![
                OpTag::Equal,
                OpTag::Delete,
                OpTag::Equal,
                OpTag::Replace,
                OpTag::Equal
            ]
        );
        assert_eq!(ops[1].old, 1..2);
        assert_eq!(ops[3].old, 3..4);
        assert_eq!(ops[3].new, 2..3);
    }

    #[test]
    fn test_opcodes_cover_both_sequences() {
        let a = words("a b c d e f g h");
        let b = words("x a c d y z g h w");
        let ops = opcodes(&a, &b);

        let mut old_pos = 0;
        let mut new_pos = 0;
        for op in &ops {
            assert_eq!(op.old.start, old_pos);
            assert_eq!(op.new.start, new_pos);
            old_pos = op.old.end;
            new_pos = op.new.end;
            if op.tag == OpTag::Equal {
                assert_eq!(a[op.old.clone()], b[op.new.clone()]);
            }
        }
        assert_eq!(old_pos, a.len());
        assert_eq!(new_pos, b.len());
    }

    #[test]
    fn test_oversized_middle_becomes_single_replace() {
        let middle = 2100;
        let build = |side: &str| {
            let mut seq = vec!["Publications".to_string()];
            seq.extend((0..middle).map(|k| {
                if k == middle / 2 {
                    "shared".to_string()
                } else {
                    format!("{}{}", side, k)
                }
            }));
            seq.push("Contact".to_string());
            seq
        };
        let a = build("old");
        let b = build("new");
        assert!((middle + 1) * (middle + 1) > MAX_ALIGNMENT_CELLS);

        let ops = opcodes(&a, &b);
        assert_eq!(tags(&ops), vec![OpTag::Equal, OpTag::Replace, OpTag::Equal]);
        assert_eq!(ops[1].old, 1..middle + 1);
        assert_eq!(ops[1].new, 1..middle + 1);
        assert_eq!(ops[2].old, middle + 1..middle + 2);
    }
}
