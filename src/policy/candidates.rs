//! Candidate set: the calls currently permitted under the active policy.
//!
//! Backed by a dense vector (uniform random choice) plus a position index
//! (O(1) membership and removal via swap-remove). The membership contract
//! is by value equality of the ordered pair.

use std::collections::HashMap;

use rand::Rng;

use crate::topology::Call;

/// The working collection of currently permitted calls.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    calls: Vec<Call>,
    index: HashMap<Call, usize>,
}

impl CandidateSet {
    /// Empty candidate set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of permitted calls.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// True if no call is permitted.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// True if `call` is currently permitted.
    pub fn contains(&self, call: Call) -> bool {
        self.index.contains_key(&call)
    }

    /// Add a call. Returns false if it was already present.
    pub fn insert(&mut self, call: Call) -> bool {
        if self.index.contains_key(&call) {
            return false;
        }
        self.index.insert(call, self.calls.len());
        self.calls.push(call);
        true
    }

    /// Remove a call by value. Returns false if it was absent.
    pub fn remove(&mut self, call: Call) -> bool {
        let Some(pos) = self.index.remove(&call) else {
            return false;
        };
        self.calls.swap_remove(pos);
        // The element swapped into `pos` (if any) needs its index refreshed.
        if pos < self.calls.len() {
            self.index.insert(self.calls[pos], pos);
        }
        true
    }

    /// Drop every call.
    pub fn clear(&mut self) {
        self.calls.clear();
        self.index.clear();
    }

    /// Pick one permitted call uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Call> {
        if self.calls.is_empty() {
            return None;
        }
        Some(self.calls[rng.gen_range(0..self.calls.len())])
    }

    /// Iterate over the permitted calls (arbitrary order).
    pub fn iter(&self) -> impl Iterator<Item = Call> + '_ {
        self.calls.iter().copied()
    }
}
