//! Blank-node identifier sequence.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Monotonic generator of blank-node identifiers, shared by one editing session.
///
/// Identifiers run `a`, `b`, … `z`, then continue bijective base-26:
/// `aa`, `ab`, … `az`, `ba`, … `zz`, `aaa`, …
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlankNodeCounter {
    /// Highest identifier handed out or claimed so far.
    issued: u64,
    /// Every identifier handed out or claimed.
    #[serde(default)]
    taken: BTreeSet<u64>,
}

impl BlankNodeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next identifier. Never repeats within this counter's lifetime.
    pub fn next_id(&mut self) -> String {
        self.issued += 1;
        self.taken.insert(self.issued);
        encode(self.issued)
    }

    /// Record that `id` is in use so later calls never produce it again.
    ///
    /// Returns `false` if `id` is not a well-formed generated identifier or
    /// is already in use.
    pub fn claim(&mut self, id: &str) -> bool {
        match decode(id) {
            Some(n) if self.taken.insert(n) => {
                self.issued = self.issued.max(n);
                true
            }
            _ => false,
        }
    }

    pub fn is_taken(&self, id: &str) -> bool {
        decode(id).is_some_and(|n| self.taken.contains(&n))
    }

    pub fn issued(&self) -> u64 {
        self.issued
    }
}

/// 1 → `a`, 26 → `z`, 27 → `aa`.
fn encode(mut n: u64) -> String {
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn decode(id: &str) -> Option<u64> {
    if id.is_empty() || id.len() > 12 {
        return None;
    }
    id.bytes().try_fold(0u64, |acc, b| {
        b.is_ascii_lowercase()
            .then(|| acc * 26 + u64::from(b - b'a') + 1)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_starts_at_a() {
        let mut c = BlankNodeCounter::new();
        let ids: Vec<_> = (0..3).map(|_| c.next_id()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_rolls_past_z() {
        let mut c = BlankNodeCounter::new();
        let ids: Vec<_> = (0..28).map(|_| c.next_id()).collect();
        assert_eq!(ids[25], "z");
        assert_eq!(ids[26], "aa");
        assert_eq!(ids[27], "ab");
    }

    #[test]
    fn test_encode_decode_agree() {
        for n in [1, 26, 27, 52, 53, 702, 703, 18_278] {
            assert_eq!(decode(&encode(n)), Some(n));
        }
        assert_eq!(encode(702), "zz");
        assert_eq!(encode(703), "aaa");
    }

    #[test]
    fn test_claim_advances() {
        let mut c = BlankNodeCounter::new();
        assert!(c.claim("c"));
        assert_eq!(c.next_id(), "d");
        assert!(c.claim("a"));
        assert_eq!(c.next_id(), "e");
        assert!(!c.claim("B1"));
    }

    #[test]
    fn test_claim_rejects_ids_in_use() {
        let mut c = BlankNodeCounter::new();
        assert_eq!(c.next_id(), "a");
        assert!(!c.claim("a"));
        assert!(c.claim("c"));
        assert!(!c.claim("c"));
        assert!(c.is_taken("c"));
        assert!(!c.is_taken("b"));
        assert_eq!(c.next_id(), "d");
    }
}
