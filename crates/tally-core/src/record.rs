use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;

/// Best-effort identifier of a visitor.
///
/// Derived from proxy headers or a browser fingerprint, so it may be empty,
/// shared between visitors, or change between sessions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of engagement a store counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    Likes,
    Views,
}

impl CounterKind {
    /// Namespace used for storage keys and file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            CounterKind::Likes => "likes",
            CounterKind::Views => "views",
        }
    }

    /// Suffix of the key holding the actor set in key-value backends.
    pub fn actors_suffix(&self) -> &'static str {
        match self {
            CounterKind::Likes => "ips",
            CounterKind::Views => "visitors",
        }
    }
}

impl Display for CounterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a recorded action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delta {
    /// Count the actor in: add to the actor set and increment.
    Increment,
    /// Count the actor out: remove from the actor set and decrement, floored at zero.
    Decrement,
}

/// The persisted state of one slug for one counter kind.
///
/// A slug without a record behaves exactly like `EngagementRecord::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementRecord {
    pub count: u64,
    #[serde(default)]
    pub actors: BTreeSet<String>,
}

impl EngagementRecord {
    pub fn has_actor(&self, actor: &ActorId) -> bool {
        self.actors.contains(actor.as_str())
    }

    /// Applies `delta` for `actor` and returns the new count.
    pub fn apply(&mut self, actor: &ActorId, delta: Delta) -> u64 {
        match delta {
            Delta::Increment => {
                self.actors.insert(actor.as_str().to_owned());
                self.count = self.count.saturating_add(1);
            }
            Delta::Decrement => {
                self.actors.remove(actor.as_str());
                self.count = self.count.saturating_sub(1);
            }
        }
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_adds_actor() {
        let mut record = EngagementRecord::default();
        let actor = ActorId::new("1.2.3.4");

        assert_eq!(record.apply(&actor, Delta::Increment), 1);
        assert!(record.has_actor(&actor));
    }

    #[test]
    fn decrement_is_floored_at_zero() {
        let mut record = EngagementRecord::default();
        let actor = ActorId::new("1.2.3.4");

        assert_eq!(record.apply(&actor, Delta::Decrement), 0);
        assert_eq!(record.apply(&actor, Delta::Decrement), 0);
        assert!(!record.has_actor(&actor));
    }

    #[test]
    fn increment_then_decrement_restores_record() {
        let mut record = EngagementRecord::default();
        let actor = ActorId::new("a");

        record.apply(&actor, Delta::Increment);
        record.apply(&actor, Delta::Decrement);

        assert_eq!(record, EngagementRecord::default());
    }

    #[test]
    fn repeated_increments_count_every_time() {
        // Views rely on this: the record itself never de-duplicates.
        let mut record = EngagementRecord::default();
        let actor = ActorId::new("a");

        record.apply(&actor, Delta::Increment);
        assert_eq!(record.apply(&actor, Delta::Increment), 2);
        assert_eq!(record.actors.len(), 1);
    }

    #[test]
    fn kind_key_parts() {
        assert_eq!(CounterKind::Likes.as_str(), "likes");
        assert_eq!(CounterKind::Likes.actors_suffix(), "ips");
        assert_eq!(CounterKind::Views.as_str(), "views");
        assert_eq!(CounterKind::Views.actors_suffix(), "visitors");
    }
}
