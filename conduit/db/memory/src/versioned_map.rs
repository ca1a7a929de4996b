use {
    conduit_types::{Batch, Op},
    std::{borrow::Borrow, collections::BTreeMap, ops::RangeBounds},
};

/// A map that remembers every value a key has had, by version.
///
/// `None` in a key's history marks a deletion.
#[derive(Debug, Clone)]
pub struct VersionedMap<K, V> {
    data: BTreeMap<K, BTreeMap<u64, Option<V>>>,
}

impl<K, V> Default for VersionedMap<K, V> {
    fn default() -> Self {
        Self {
            data: BTreeMap::new(),
        }
    }
}

impl<K, V> VersionedMap<K, V>
where
    K: Ord,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// The value of the key as of the given version.
    pub fn get<Q>(&self, key: &Q, version: u64) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.data
            .get(key)
            .and_then(|history| value_at(history, version))
    }

    /// Iterate keys within the bounds that have a value as of the given
    /// version, in ascending order.
    ///
    /// Panics under the same conditions as `BTreeMap::range`.
    pub fn range<R, Q>(&self, bounds: R, version: u64) -> impl Iterator<Item = (&K, &V)>
    where
        K: Borrow<Q>,
        R: RangeBounds<Q>,
        Q: Ord + ?Sized,
    {
        self.data
            .range(bounds)
            .filter_map(move |(key, history)| {
                value_at(history, version).map(|value| (key, value))
            })
    }

    /// Apply a batch of writes as the given version.
    pub fn write_batch(&mut self, version: u64, batch: Batch)
    where
        K: From<Vec<u8>>,
        V: From<Vec<u8>>,
    {
        for (key, op) in batch {
            let value = match op {
                Op::Insert(value) => Some(V::from(value)),
                Op::Delete => None,
            };

            self.data.entry(K::from(key)).or_default().insert(version, value);
        }
    }

    /// Forget history that's no longer needed to read any version at or above
    /// `up_to`.
    ///
    /// For each key, only the latest entry below `up_to` is kept, as it's
    /// still the value at `up_to` unless overwritten. It's dropped too if it's
    /// a deletion, and keys left without history are removed.
    pub fn prune(&mut self, up_to: u64) {
        for history in self.data.values_mut() {
            let mut newer = history.split_off(&up_to);

            if let Some((version, Some(value))) = history.pop_last() {
                newer.entry(version).or_insert(Some(value));
            }

            *history = newer;
        }

        self.data.retain(|_, history| !history.is_empty());
    }
}

fn value_at<V>(history: &BTreeMap<u64, Option<V>>, version: u64) -> Option<&V> {
    history
        .range(..=version)
        .next_back()
        .and_then(|(_, value)| value.as_ref())
}
