//! Cache Statistics Module
//!
//! Aggregate hit/miss accounting read back from the backend counters.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of the global hit/miss counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Reads that returned at least one cached message
    pub hit: u64,
    /// Reads that returned none
    pub miss: u64,
    /// Percentage of hits over all reads, e.g. `"50.00%"`
    #[serde(rename = "hitRate")]
    pub hit_rate: String,
}

impl CacheStats {
    // == Constructor ==
    /// Builds a snapshot, deriving the formatted hit rate.
    pub fn new(hit: u64, miss: u64) -> Self {
        let total = hit + miss;
        let hit_rate = if total > 0 {
            format!("{:.2}%", (hit as f64 / total as f64) * 100.0)
        } else {
            "0.00%".to_string()
        };
        Self {
            hit,
            miss,
            hit_rate,
        }
    }
}

/// Parses a stored counter value, treating absent or malformed values as 0.
pub(crate) fn parse_counter(value: Option<&Vec<u8>>) -> u64 {
    value
        .and_then(|bytes| std::str::from_utf8(bytes).ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_zero_counters() {
        let stats = CacheStats::new(0, 0);
        assert_eq!(stats.hit, 0);
        assert_eq!(stats.miss, 0);
        assert_eq!(stats.hit_rate, "0.00%");
    }

    #[test]
    fn test_stats_even_split() {
        let stats = CacheStats::new(1, 1);
        assert_eq!(stats.hit_rate, "50.00%");
    }

    #[test]
    fn test_stats_rounding() {
        let stats = CacheStats::new(1, 2);
        assert_eq!(stats.hit_rate, "33.33%");
    }

    #[test]
    fn test_stats_all_hits() {
        let stats = CacheStats::new(7, 0);
        assert_eq!(stats.hit_rate, "100.00%");
    }

    #[test]
    fn test_stats_serializes_hit_rate_field() {
        let stats = CacheStats::new(4, 1);
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"hitRate\":\"80.00%\""));
    }

    #[test]
    fn test_parse_counter_defaults() {
        assert_eq!(parse_counter(None), 0);
        assert_eq!(parse_counter(Some(&b"12".to_vec())), 12);
        assert_eq!(parse_counter(Some(&b"garbage".to_vec())), 0);
    }
}
