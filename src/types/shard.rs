use std::slice::Iter;

/// One partition of the stream, carrying its current read iterator. The
/// iterator is set once at discovery and reassigned after every successful
/// read; it becomes absent once the service reports no further iterator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    id: String,
    iterator: Option<String>,
}

impl Shard {
    pub fn new<T: Into<String>>(id: T, iterator: Option<String>) -> Self {
        Self {
            id: id.into(),
            iterator,
        }
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn iterator(&self) -> Option<&str> {
        self.iterator.as_deref()
    }

    pub fn set_iterator(&mut self, iterator: Option<String>) {
        self.iterator = iterator;
    }
}

/// The directory of shards produced by one discovery pass. Between two passes
/// the set of ids is fixed and only iterators mutate; the whole value is
/// replaced, never merged, on rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shards(Vec<Shard>);

impl Shards {
    pub fn new() -> Self {
        Self(vec![])
    }

    pub fn push(&mut self, shard: Shard) {
        self.0.push(shard);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, Shard> {
        self.0.iter()
    }

    /// A stale directory requires a full rediscovery: it is either empty or
    /// holds at least one shard whose iterator is gone (closed or drained).
    pub fn is_stale(&self) -> bool {
        self.0.is_empty() || self.0.iter().any(|shard| shard.iterator.is_none())
    }
}

impl From<Vec<Shard>> for Shards {
    fn from(shards: Vec<Shard>) -> Self {
        Self(shards)
    }
}

impl IntoIterator for Shards {
    type Item = Shard;
    type IntoIter = std::vec::IntoIter<Shard>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
