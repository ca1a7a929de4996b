use {
    crate::{Bound, Codec, PrimaryKey, RawBound},
    conduit_types::{
        Order, Record, StdResult, Storage, concat, extend_one_byte, increment_last_byte,
        nested_namespaces_with_key, trim,
    },
    std::{borrow::Cow, marker::PhantomData},
};

/// A view over all entries of a map sharing the same key prefix.
pub struct Prefix<K, T, C>
where
    C: Codec<T>,
{
    namespace: Vec<u8>,
    suffix: PhantomData<K>,
    data: PhantomData<T>,
    codec: PhantomData<C>,
}

impl<K, T, C> Prefix<K, T, C>
where
    C: Codec<T>,
{
    pub fn new(namespace: &[u8], prefixes: &[Cow<[u8]>]) -> Self {
        Self {
            namespace: nested_namespaces_with_key(Some(namespace), prefixes, None),
            suffix: PhantomData,
            data: PhantomData,
            codec: PhantomData,
        }
    }
}

impl<K, T, C> Prefix<K, T, C>
where
    K: PrimaryKey,
    C: Codec<T>,
{
    pub fn range_raw<'a>(
        &self,
        storage: &'a dyn Storage,
        min: Option<Bound<K>>,
        max: Option<Bound<K>>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'a> {
        // The store treats the min bound as inclusive and the max as exclusive.
        let (min, max) = range_bounds(&self.namespace, min, max);

        let namespace = self.namespace.clone();
        let iter = storage
            .scan(Some(&min), Some(&max), order)
            .map(move |(k, v)| (trim(&namespace, &k), v));

        Box::new(iter)
    }

    pub fn range<'a>(
        &self,
        storage: &'a dyn Storage,
        min: Option<Bound<K>>,
        max: Option<Bound<K>>,
        order: Order,
    ) -> Box<dyn Iterator<Item = StdResult<(K::Output, T)>> + 'a> {
        let iter = self
            .range_raw(storage, min, max, order)
            .map(|(key_raw, value_raw)| {
                let key = K::from_slice(&key_raw)?;
                let value = C::decode(&value_raw)?;
                Ok((key, value))
            });

        Box::new(iter)
    }
}

fn range_bounds<K>(
    namespace: &[u8],
    min: Option<Bound<K>>,
    max: Option<Bound<K>>,
) -> (Vec<u8>, Vec<u8>)
where
    K: PrimaryKey,
{
    let min = match min.map(RawBound::from) {
        None => namespace.to_vec(),
        Some(RawBound::Inclusive(k)) => concat(namespace, &k),
        Some(RawBound::Exclusive(k)) => concat(namespace, &extend_one_byte(k)),
    };
    let max = match max.map(RawBound::from) {
        None => increment_last_byte(namespace.to_vec()),
        Some(RawBound::Inclusive(k)) => concat(namespace, &extend_one_byte(k)),
        Some(RawBound::Exclusive(k)) => concat(namespace, &k),
    };

    (min, max)
}
