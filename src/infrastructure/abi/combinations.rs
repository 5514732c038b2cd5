//! k-of-n index combinations

/// Iterator over every `k`-element subset of `0..n`, in lexicographic order
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    current: Option<Vec<usize>>,
}

/// All ways of choosing `k` positions out of `n`
pub fn combinations(n: usize, k: usize) -> Combinations {
    Combinations {
        n,
        current: (k <= n).then(|| (0..k).collect()),
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let n = self.n;
        let current = self.current.as_mut()?;
        let item = current.clone();
        let k = current.len();

        // rightmost position that can still move right
        match (0..k).rev().find(|&i| current[i] < n - k + i) {
            Some(i) => {
                current[i] += 1;
                for j in i + 1..k {
                    current[j] = current[j - 1] + 1;
                }
            }
            None => self.current = None,
        }
        Some(item)
    }
}
