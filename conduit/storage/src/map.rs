use {
    crate::{Borsh, Bound, Codec, Path, Prefix, Prefixer, PrimaryKey},
    conduit_types::{Order, StdResult, Storage},
    std::marker::PhantomData,
};

pub struct Map<'a, K, T, C = Borsh>
where
    C: Codec<T>,
{
    namespace: &'a [u8],
    key: PhantomData<K>,
    data: PhantomData<T>,
    codec: PhantomData<C>,
}

impl<'a, K, T, C> Map<'a, K, T, C>
where
    C: Codec<T>,
{
    pub const fn new(namespace: &'a str) -> Self {
        Self {
            namespace: namespace.as_bytes(),
            key: PhantomData,
            data: PhantomData,
            codec: PhantomData,
        }
    }
}

impl<K, T, C> Map<'_, K, T, C>
where
    K: PrimaryKey,
    C: Codec<T>,
{
    /// The full path under which the value of the given key is stored.
    pub fn path(&self, key: K) -> Path<'static, T, C> {
        let mut raw_keys = key.raw_keys();
        let last_raw_key = raw_keys.pop();
        Path::new(self.namespace, &raw_keys, last_raw_key.as_ref())
    }

    fn no_prefix(&self) -> Prefix<K, T, C> {
        Prefix::new(self.namespace, &[])
    }

    pub fn prefix(&self, prefix: K::Prefix) -> Prefix<K::Suffix, T, C> {
        Prefix::new(self.namespace, &prefix.raw_prefixes())
    }

    // ---------------------- methods for single entries -----------------------

    pub fn has(&self, storage: &dyn Storage, key: K) -> bool {
        self.path(key).exists(storage)
    }

    pub fn may_load(&self, storage: &dyn Storage, key: K) -> StdResult<Option<T>> {
        self.path(key).may_load(storage)
    }

    pub fn load(&self, storage: &dyn Storage, key: K) -> StdResult<T> {
        self.path(key).load(storage)
    }

    pub fn save(&self, storage: &mut dyn Storage, key: K, data: &T) -> StdResult<()> {
        self.path(key).save(storage, data)
    }

    pub fn remove(&self, storage: &mut dyn Storage, key: K) {
        self.path(key).remove(storage)
    }

    // --------------------------- iteration methods ---------------------------

    pub fn range<'b>(
        &self,
        storage: &'b dyn Storage,
        min: Option<Bound<K>>,
        max: Option<Bound<K>>,
        order: Order,
    ) -> Box<dyn Iterator<Item = StdResult<(K::Output, T)>> + 'b> {
        self.no_prefix().range(storage, min, max, order)
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {
        super::*,
        conduit_types::{ChannelIdentity, MockStorage, Sequence},
    };

    const DIGESTS: Map<(&ChannelIdentity, Sequence), u32> = Map::new("digests");

    fn channel(n: u64) -> ChannelIdentity {
        ChannelIdentity::parse("transfer", &format!("channel-{n}")).unwrap()
    }

    fn setup() -> MockStorage {
        let mut storage = MockStorage::new();
        for (n, seqs) in [(0, [1, 2, 3]), (1, [2, 4, 6])] {
            let id = channel(n);
            for seq in seqs {
                DIGESTS
                    .save(&mut storage, (&id, Sequence::new(seq)), &(seq as u32 * 10))
                    .unwrap();
            }
        }
        storage
    }

    #[test]
    fn prefix_isolates_channels() {
        let storage = setup();

        let seqs = DIGESTS
            .prefix(&channel(1))
            .range(&storage, None, None, Order::Ascending)
            .map(|res| res.map(|(seq, _)| seq.number()))
            .collect::<StdResult<Vec<_>>>()
            .unwrap();
        assert_eq!(seqs, [2, 4, 6]);

        let seqs = DIGESTS
            .prefix(&channel(0))
            .range(
                &storage,
                Some(Bound::Exclusive(Sequence::new(1))),
                None,
                Order::Descending,
            )
            .collect::<StdResult<Vec<_>>>()
            .unwrap();
        assert_eq!(seqs, [(Sequence::new(3), 30), (Sequence::new(2), 20)]);
    }

    #[test]
    fn full_range_decodes_compound_keys() {
        let storage = setup();

        let all = DIGESTS
            .range(&storage, None, None, Order::Ascending)
            .collect::<StdResult<Vec<_>>>()
            .unwrap();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0], ((channel(0), Sequence::new(1)), 10));
        assert_eq!(all[5], ((channel(1), Sequence::new(6)), 60));
    }

    #[test]
    fn point_reads() {
        let mut storage = setup();
        let id = channel(0);

        assert!(DIGESTS.has(&storage, (&id, Sequence::new(2))));
        DIGESTS.remove(&mut storage, (&id, Sequence::new(2)));
        assert!(!DIGESTS.has(&storage, (&id, Sequence::new(2))));
        assert_eq!(DIGESTS.may_load(&storage, (&id, Sequence::new(2))).unwrap(), None);
        assert_eq!(DIGESTS.load(&storage, (&id, Sequence::new(3))).unwrap(), 30);
    }
}
