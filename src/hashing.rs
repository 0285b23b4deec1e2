//! Hash functions accepted by the map engines.
//!
//! Both engines take a plain function pointer at construction and only ever use its result
//! modulo the table capacity. No seeding or post-mixing is applied.

/// Shape of a hash function usable by [`OpenAddressingMap`](crate::OpenAddressingMap) and
/// [`ChainedMap`](crate::ChainedMap).
pub type HashFunction = fn(&str) -> u64;

/// Sums the code points of the key's characters.
///
/// Anagrams collide, which makes this function handy for exercising collision paths.
#[must_use]
pub fn hash_function_1(key: &str) -> u64 {
    key.chars().fold(0_u64, |hash, letter| hash.wrapping_add(u64::from(letter)))
}

/// Sums the code points of the key's characters weighted by their 1-based position.
#[must_use]
pub fn hash_function_2(key: &str) -> u64 {
    key.chars().zip(1_u64..).fold(0_u64, |hash, (letter, position)| {
        hash.wrapping_add(position.wrapping_mul(u64::from(letter)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_function_1() {
        assert_eq!(hash_function_1(""), 0);
        assert_eq!(hash_function_1("a"), 97);
        assert_eq!(hash_function_1("key1"), 107 + 101 + 121 + 49);
        assert_eq!(hash_function_1("ab"), hash_function_1("ba"));
    }

    #[test]
    fn test_hash_function_2() {
        assert_eq!(hash_function_2(""), 0);
        assert_eq!(hash_function_2("a"), 97);
        assert_eq!(hash_function_2("ab"), 97 + 2 * 98);
        assert_ne!(hash_function_2("ab"), hash_function_2("ba"));
    }
}
