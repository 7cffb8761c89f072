//! Bounded composition enumeration (human action space)
//!
//! A composition of `n` into `k` parts is an ordered `k`-tuple of
//! non-negative integers summing to exactly `n`. Compositions are produced in
//! lexicographic order: the first coordinate ascends from `0` to `n`, and for
//! each choice the remainder is enumerated over the remaining coordinates in
//! the same order. For `n = 4, k = 2` that is
//! `[0,4], [1,3], [2,2], [3,1], [4,0]`.
//!
//! The iterator keeps only the current tuple and steps to its lexicographic
//! successor, so it never recurses and costs `O(k)` memory for any `n`.

/// Lazy iterator over the compositions of `n` into `k` parts
#[derive(Debug, Clone)]
pub struct Compositions {
    next: Option<Vec<u32>>,
}

impl Compositions {
    /// Enumerate compositions of `n` into `k` parts
    ///
    /// Negative `n` or `k` yields nothing. `k == 0` yields the single empty
    /// tuple when `n == 0` and nothing otherwise. `n` beyond `u32::MAX` yields
    /// nothing.
    pub fn new(n: i64, k: i64) -> Self {
        let first = if n < 0 || k < 0 {
            None
        } else if k == 0 {
            (n == 0).then(Vec::new)
        } else {
            u32::try_from(n).ok().map(|total| {
                let mut first = vec![0; k as usize];
                first[k as usize - 1] = total;
                first
            })
        };
        Self { next: first }
    }
}

impl Iterator for Compositions {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Vec<u32>> {
        let current = self.next.take()?;
        self.next = successor(&current);
        Some(current)
    }
}

/// Lexicographic successor of a composition, or `None` if it is the last one
fn successor(current: &[u32]) -> Option<Vec<u32>> {
    let k = current.len();
    if k < 2 {
        return None;
    }
    let last = k - 1;

    // Rightmost position (before the last) that still has mass after it
    let pivot = if current[last] > 0 {
        last - 1
    } else {
        let nonzero = current[..last].iter().rposition(|&x| x > 0)?;
        if nonzero == 0 {
            return None;
        }
        nonzero - 1
    };

    let remainder: u32 = current[pivot + 1..].iter().sum();
    let mut next = current.to_vec();
    next[pivot] += 1;
    for x in next[pivot + 1..].iter_mut() {
        *x = 0;
    }
    next[last] = remainder - 1;
    Some(next)
}

/// Enumerate compositions of `n` into `k` parts
pub fn compositions(n: i64, k: i64) -> Compositions {
    Compositions::new(n, k)
}

/// Number of compositions of `n` into `k` parts: `C(n+k-1, k-1)`
pub fn composition_count(n: u64, k: u64) -> u128 {
    if k == 0 {
        return u128::from(n == 0);
    }
    binomial(n + k - 1, k - 1)
}

/// Binomial coefficient `C(n, r)`
pub fn binomial(n: u64, r: u64) -> u128 {
    if r > n {
        return 0;
    }
    let r = r.min(n - r);
    let mut acc: u128 = 1;
    for i in 0..r {
        // Exact at every step: acc * (n - i) is divisible by (i + 1)
        acc = acc * u128::from(n - i) / u128::from(i + 1);
    }
    acc
}
