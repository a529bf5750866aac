//! Order number generation.
//!
//! Numbers are Unix seconds followed by eight hex characters from a fresh
//! UUIDv4, which keeps them roughly sortable by creation time. Uniqueness is
//! probabilistic; the `orders.order_no` unique constraint is the
//! authoritative guard, and checkout retries with a fresh number if it ever
//! trips.

use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

/// Hex characters of entropy appended after the timestamp.
const SUFFIX_LEN: usize = 8;

/// Generate an order number.
#[must_use]
pub fn generate() -> String {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let suffix = Uuid::new_v4().simple().to_string();
    let suffix = suffix.get(..SUFFIX_LEN).unwrap_or(&suffix);
    format!("{seconds}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_format_is_timestamp_plus_suffix() {
        let number = generate();
        assert_eq!(number.len(), 10 + SUFFIX_LEN);

        let (ts, suffix) = number.split_at(10);
        let parsed: u64 = ts.parse().expect("leading timestamp");
        assert!(parsed > 1_600_000_000, "plausible Unix seconds");
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_numbers_are_distinct_within_one_second() {
        let numbers: HashSet<String> = (0..1000).map(|_| generate()).collect();
        assert_eq!(numbers.len(), 1000);
    }

    #[test]
    fn test_numbers_sort_with_time() {
        // Same-second numbers share a prefix; later seconds sort after.
        let number = generate();
        let (ts, _) = number.split_at(10);
        let later = format!("{}{}", ts.parse::<u64>().expect("timestamp") + 60, "00000000");
        assert!(later > number);
    }
}
