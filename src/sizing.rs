//! Prime capacity selection shared by both map engines.

/// Returns `true` if `n` is prime.
///
/// Odd candidates are trial-divided by odd factors up to `⌊√n⌋`.
#[must_use]
pub fn is_prime(n: usize) -> bool {
    if n == 2 || n == 3 {
        return true;
    }
    if n <= 1 || n % 2 == 0 {
        return false;
    }

    let mut factor: usize = 3;
    while factor.saturating_mul(factor) <= n {
        if n.checked_rem(factor) == Some(0) {
            return false;
        }
        factor = factor.saturating_add(2);
    }

    true
}

/// Returns the first odd prime that is not smaller than `n`.
///
/// Even inputs are bumped to the next odd number before the search starts, so `next_prime(2)`
/// is `Some(3)` while `next_prime(3)` is `Some(3)`. Map capacities depend on this exact
/// behaviour.
///
/// Returns `None` when no such prime fits in a `usize`, i.e. `n` is above the largest
/// representable prime.
#[must_use]
pub fn next_prime(n: usize) -> Option<usize> {
    let mut candidate = if n % 2 == 0 { n.checked_add(1)? } else { n };

    while !is_prime(candidate) {
        candidate = candidate.checked_add(2)?;
    }

    Some(candidate)
}

/// Normalizes a requested capacity the way `resize_table` does: primes are kept as they are,
/// everything else goes through [`next_prime`].
#[must_use]
pub(crate) fn prime_at_least(n: usize) -> Option<usize> {
    if is_prime(n) { Some(n) } else { next_prime(n) }
}
