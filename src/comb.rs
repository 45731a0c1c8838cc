//! Binomial coefficient cache.
//!
//! Small arguments hit a precomputed Pascal table; anything larger falls back
//! to the multiplicative formula. Overflow wraps silently in the configured
//! count type (pick the `count128` feature for workloads that need it).

use std::sync::OnceLock;

use crate::count::Count;

const TABLE_DIM: usize = 100;

pub struct CombCache {
    // flat TABLE_DIM x TABLE_DIM, zero above the diagonal
    table: Vec<Count>,
}

impl CombCache {
    pub fn new() -> Self {
        let mut table = vec![0 as Count; TABLE_DIM * TABLE_DIM];
        for n in 0..TABLE_DIM {
            for k in 0..=n {
                table[n * TABLE_DIM + k] = if k == 0 || k == n {
                    1
                } else {
                    table[(n - 1) * TABLE_DIM + (k - 1)]
                        .wrapping_add(table[(n - 1) * TABLE_DIM + k])
                };
            }
        }
        CombCache { table }
    }

    pub fn choose(&self, n: usize, k: usize) -> Count {
        if n < TABLE_DIM && k < TABLE_DIM {
            return self.table[n * TABLE_DIM + k];
        }
        Self::compute(n, k)
    }

    fn compute(n: usize, k: usize) -> Count {
        if k > n {
            return 0;
        }
        if k == 0 || k == n {
            return 1;
        }
        // C(n, k) == C(n, n - k); the smaller side keeps the loop short and
        // every intermediate division exact.
        let k = k.min(n - k);
        let mut result: Count = 1;
        for i in 1..=k {
            result = result.wrapping_mul((n - (k - i)) as Count) / i as Count;
        }
        result
    }
}

impl Default for CombCache {
    fn default() -> Self {
        Self::new()
    }
}

static CACHE: OnceLock<CombCache> = OnceLock::new();

/// The process-global cache, built on first use.
pub fn cache() -> &'static CombCache {
    CACHE.get_or_init(CombCache::new)
}

/// C(n, k) in the configured count type.
pub fn n_choose_k(n: usize, k: usize) -> Count {
    cache().choose(n, k)
}
