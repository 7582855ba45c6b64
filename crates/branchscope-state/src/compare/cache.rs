use branchscope_core::domain::{CommitId, Divergence};
use rustc_hash::{FxHashMap, FxHashSet};

/// Ordered ref pair. The divergence stored under `(from, to)` is that of `from`
/// relative to `to`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ComparisonKey {
    pub from: CommitId,
    pub to: CommitId,
}

impl ComparisonKey {
    pub fn new(from: CommitId, to: CommitId) -> Self {
        Self { from, to }
    }

    pub fn swapped(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }

    fn mentions(&self, commit: &CommitId) -> bool {
        &self.from == commit || &self.to == commit
    }
}

/// Who asked for a divergence that is still being computed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DivergenceWaiter {
    Inference,
    Selection,
}

/// Identifies one divergence computation. A pair that is pruned and requested
/// again gets a new id, so a result from the earlier run cannot complete it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct DivergenceRequestId(pub u64);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CacheLookup {
    Hit(Divergence),
    /// Already being computed; the waiter was registered on that computation.
    Pending,
    /// Nothing cached or running; the caller must start the computation and report
    /// its result under this id.
    Miss(DivergenceRequestId),
}

#[derive(Clone, Debug)]
struct InFlight {
    request: DivergenceRequestId,
    waiters: Vec<DivergenceWaiter>,
}

/// Memoized divergences for one repository.
///
/// Entries are immutable once stored and only leave through invalidation. A
/// lookup for `(b, a)` is answered from `(a, b)` with the counts swapped.
#[derive(Clone, Debug, Default)]
pub struct ComparisonCache {
    entries: FxHashMap<ComparisonKey, Divergence>,
    in_flight: FxHashMap<ComparisonKey, InFlight>,
    next_request: u64,
}

impl ComparisonCache {
    pub fn get(&self, from: &CommitId, to: &CommitId) -> Option<Divergence> {
        let key = ComparisonKey::new(from.clone(), to.clone());
        if let Some(divergence) = self.entries.get(&key) {
            return Some(*divergence);
        }
        self.entries.get(&key.swapped()).map(|d| d.swapped())
    }

    /// Stores a divergence unless either orientation is already cached.
    pub fn set(&mut self, from: CommitId, to: CommitId, divergence: Divergence) {
        if self.get(&from, &to).is_some() {
            return;
        }
        self.entries
            .insert(ComparisonKey::new(from, to), divergence);
    }

    /// Looks up `key`, joining an in-flight computation for either orientation
    /// when there is one.
    pub fn request(&mut self, key: &ComparisonKey, waiter: DivergenceWaiter) -> CacheLookup {
        if let Some(divergence) = self.get(&key.from, &key.to) {
            return CacheLookup::Hit(divergence);
        }

        let running = if self.in_flight.contains_key(key) {
            Some(key.clone())
        } else {
            let swapped = key.swapped();
            self.in_flight.contains_key(&swapped).then_some(swapped)
        };
        if let Some(running) = running {
            if let Some(in_flight) = self.in_flight.get_mut(&running)
                && !in_flight.waiters.contains(&waiter)
            {
                in_flight.waiters.push(waiter);
            }
            return CacheLookup::Pending;
        }

        self.next_request += 1;
        let request = DivergenceRequestId(self.next_request);
        self.in_flight.insert(
            key.clone(),
            InFlight {
                request,
                waiters: vec![waiter],
            },
        );
        CacheLookup::Miss(request)
    }

    /// Whether `request` is still the computation running for `key`.
    pub fn is_running(&self, key: &ComparisonKey, request: DivergenceRequestId) -> bool {
        self.in_flight
            .get(key)
            .is_some_and(|in_flight| in_flight.request == request)
    }

    pub fn running_request(&self, key: &ComparisonKey) -> Option<DivergenceRequestId> {
        self.in_flight.get(key).map(|in_flight| in_flight.request)
    }

    /// Finishes the computation for `key` and returns whoever was waiting on it.
    ///
    /// `None` marks a failed computation, which is not cached. A result for a key
    /// that was invalidated while running, or that belongs to an earlier run of the
    /// same key, is dropped and wakes nobody.
    pub fn complete(
        &mut self,
        key: &ComparisonKey,
        request: DivergenceRequestId,
        divergence: Option<Divergence>,
    ) -> Vec<DivergenceWaiter> {
        if !self.is_running(key, request) {
            return Vec::new();
        }
        let Some(in_flight) = self.in_flight.remove(key) else {
            return Vec::new();
        };
        if let Some(divergence) = divergence {
            self.set(key.from.clone(), key.to.clone(), divergence);
        }
        in_flight.waiters
    }

    /// Drops every entry and in-flight computation involving `commit`.
    pub fn invalidate(&mut self, commit: &CommitId) {
        self.entries.retain(|key, _| !key.mentions(commit));
        self.in_flight.retain(|key, _| !key.mentions(commit));
    }

    /// Keeps only pairs whose both sides are still live ref tips.
    pub fn retain_refs(&mut self, live: &FxHashSet<CommitId>) {
        let keep = |key: &ComparisonKey| live.contains(&key.from) && live.contains(&key.to);
        self.entries.retain(|key, _| keep(key));
        self.in_flight.retain(|key, _| keep(key));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.in_flight.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_in_flight(&self) -> bool {
        !self.in_flight.is_empty()
    }
}
