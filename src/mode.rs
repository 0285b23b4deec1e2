//! Single-pass frequency mode over a sequence of strings.

use crate::chained::ChainedMap;

/// The most frequent items of a sequence together with their frequency
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mode {
    /// Items reaching the highest frequency, in the order they reached it
    pub items: Vec<String>,
    /// Number of occurrences of each item in `items`; zero for an empty input
    pub frequency: usize,
}

/// Finds the items occurring most often in `items` in a single left-to-right pass.
///
/// Running counts are kept in a private [`ChainedMap`]. An item joins the result when its count
/// catches up with the best frequency seen so far; a count that overtakes it restarts the
/// result with that item alone. Each item is thus listed once, at the point where it first
/// reached the final frequency.
///
/// ```rust
/// use probechain::find_mode;
///
/// let mode = find_mode(["apple", "apple", "grape", "melon", "melon", "peach"]);
/// assert_eq!(mode.items, vec!["apple", "melon"]);
/// assert_eq!(mode.frequency, 2);
/// ```
pub fn find_mode<I>(items: I) -> Mode
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut counts: ChainedMap<usize> = ChainedMap::new();
    let mut mode = Mode::default();

    for item in items {
        let item = item.as_ref();
        let count = counts.get(item).map_or(1, |count| count.saturating_add(1));
        counts.put(item.to_string(), count);

        if count == mode.frequency {
            mode.items.push(item.to_string());
        } else if count > mode.frequency {
            mode.frequency = count;
            mode.items.clear();
            mode.items.push(item.to_string());
        }
    }

    mode
}
