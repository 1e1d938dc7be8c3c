//! Record identifiers.
//!
//! Records are keyed by an opaque string. Seed data uses short literal ids
//! (`"1"`, `"2"`); records created at runtime get the Unix timestamp in
//! milliseconds, bumped when two creations land in the same millisecond.

use core::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};

/// Opaque identifier of a record within its collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Hands out timestamp-derived ids that never repeat within a process.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    /// Next id for the current wall-clock millisecond.
    pub fn next_id(&self) -> RecordId {
        self.next_id_at(chrono::Utc::now().timestamp_millis())
    }

    /// Next id for the given millisecond timestamp.
    ///
    /// Returns `millis` unless an id at or after it was already issued, in
    /// which case the previous id plus one.
    pub fn next_id_at(&self, millis: i64) -> RecordId {
        let mut current = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = millis.max(current + 1);
            match self.last.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return RecordId(candidate.to_string()),
                Err(actual) => current = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_timestamp() {
        let ids = IdGenerator::new();
        assert_eq!(ids.next_id_at(1_700_000_000_000).as_str(), "1700000000000");
    }

    #[test]
    fn test_same_millisecond_is_bumped() {
        let ids = IdGenerator::new();
        let a = ids.next_id_at(42);
        let b = ids.next_id_at(42);
        let c = ids.next_id_at(10);
        assert_eq!(a.as_str(), "42");
        assert_eq!(b.as_str(), "43");
        assert_eq!(c.as_str(), "44");
    }

    #[test]
    fn test_concurrent_ids_are_unique() {
        let ids = std::sync::Arc::new(IdGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = std::sync::Arc::clone(&ids);
                std::thread::spawn(move || (0..250).map(|_| ids.next_id_at(7)).collect::<Vec<_>>())
            })
            .collect();

        let mut all = std::collections::HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap_or_default() {
                assert!(all.insert(id));
            }
        }
        assert_eq!(all.len(), 1000);
    }

    #[test]
    fn test_record_id_serializes_as_string() {
        let id = RecordId::from("7");
        assert_eq!(serde_json::to_string(&id).ok().as_deref(), Some("\"7\""));
    }
}
