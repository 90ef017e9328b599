use std::collections::HashSet;

/// First-wins identity filter for one acquisition run.
///
/// The empty string is an ordinary key: several rows without an identity
/// collapse into a single bucket. The pipeline rejects empty identities
/// before admission, so this only matters to direct callers.
#[derive(Debug, Default)]
pub struct DedupAccumulator {
    seen: HashSet<String>,
}

impl DedupAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `identity` as seen. Returns `true` only the first time.
    pub fn admit(&mut self, identity: &str) -> bool {
        if self.seen.contains(identity) {
            return false;
        }
        self.seen.insert(identity.to_owned())
    }

    #[must_use]
    pub fn contains(&self, identity: &str) -> bool {
        self.seen.contains(identity)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
