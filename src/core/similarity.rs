//! Title similarity based on Ratcliff/Obershelp sequence matching.
//!
//! The score is `2 * M / T` where `M` is the number of characters covered by
//! the recursively found longest common blocks and `T` is the combined length
//! of both titles.

use std::collections::HashMap;

/// A candidate is accepted only when its ratio is strictly above this value.
pub const ACCEPTANCE_THRESHOLD: f64 = 0.9;

/// Second sequences at least this long have their most frequent characters
/// excluded from the block index.
const AUTOJUNK_MIN_LEN: usize = 200;

pub fn ratio(a: &str, b: &str) -> f64 {
    TitleMatcher::new(a).ratio(b)
}

/// Compares one fixed title against many candidates.
#[derive(Debug, Clone)]
pub struct TitleMatcher {
    a: Vec<char>,
}

impl TitleMatcher {
    pub fn new(title: &str) -> Self {
        Self {
            a: title.chars().collect(),
        }
    }

    pub fn ratio(&self, other: &str) -> f64 {
        let b: Vec<char> = other.chars().collect();
        let total = self.a.len() + b.len();
        if total == 0 {
            return 1.0;
        }
        let matched = BlockMatcher::new(&self.a, &b).matched_chars();
        2.0 * matched as f64 / total as f64
    }
}

struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, indices| indices.len() <= ntest);
        }

        Self { a, b, b2j }
    }

    fn matched_chars(&self) -> usize {
        let mut total = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        total
    }

    /// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`, earliest in `a`
    /// and then earliest in `b` on ties, as `(i, j, size)`.
    fn longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(indices) = self.b2j.get(&self.a[i]) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // Characters dropped from the index as too frequent can still extend a block.
        while besti > alo && bestj > blo && self.a[besti - 1] == self.b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && self.a[besti + bestsize] == self.b[bestj + bestsize]
        {
            bestsize += 1;
        }

        (besti, bestj, bestsize)
    }
}
