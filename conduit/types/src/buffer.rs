use {
    crate::{Batch, Op, Order, Record, Storage},
    std::{collections::BTreeMap, iter, mem, ops::Bound},
};

/// A key-value storage with an in-memory write buffer.
///
/// Reads fall through to the base storage unless the key has a pending op.
/// The pending ops can be taken out with [`Buffer::disassemble`] and handed to
/// a database as the batch for its next version.
#[derive(Clone)]
pub struct Buffer<S> {
    base: S,
    pending: Batch,
}

impl<S> Buffer<S> {
    /// Create a new buffer storage with an optional write batch.
    pub fn new(base: S, pending: Option<Batch>) -> Self {
        Self {
            base,
            pending: pending.unwrap_or_default(),
        }
    }

    /// Consume self, do not flush, just return the underlying store and the
    /// pending ops.
    pub fn disassemble(self) -> (S, Batch) {
        (self.base, self.pending)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

impl<S> Buffer<S>
where
    S: Storage,
{
    /// Flush pending ops to the underlying store.
    pub fn commit(&mut self) {
        let pending = mem::take(&mut self.pending);
        self.base.flush(pending);
    }
}

impl<S> Storage for Buffer<S>
where
    S: Storage,
{
    fn read(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.pending.get(key) {
            Some(Op::Insert(value)) => Some(value.clone()),
            Some(Op::Delete) => None,
            None => self.base.read(key),
        }
    }

    fn scan<'a>(
        &'a self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'a> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Box::new(iter::empty());
            }
        }

        let mut merged = self
            .base
            .scan(min, max, Order::Ascending)
            .collect::<BTreeMap<_, _>>();

        let bounds = (
            min.map_or(Bound::Unbounded, |bytes| Bound::Included(bytes.to_vec())),
            max.map_or(Bound::Unbounded, |bytes| Bound::Excluded(bytes.to_vec())),
        );

        for (key, op) in self.pending.range(bounds) {
            if let Op::Insert(value) = op {
                merged.insert(key.clone(), value.clone());
            } else {
                merged.remove(key);
            }
        }

        match order {
            Order::Ascending => Box::new(merged.into_iter()),
            Order::Descending => Box::new(merged.into_iter().rev()),
        }
    }

    fn write(&mut self, key: &[u8], value: &[u8]) {
        self.pending.insert(key.to_vec(), Op::Insert(value.to_vec()));
    }

    fn remove(&mut self, key: &[u8]) {
        self.pending.insert(key.to_vec(), Op::Delete);
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::MockStorage};

    fn base() -> MockStorage {
        let mut base = MockStorage::new();
        base.write(b"a", b"1");
        base.write(b"b", b"2");
        base.write(b"c", b"3");
        base
    }

    #[test]
    fn pending_ops_shadow_base() {
        let mut buffer = Buffer::new(base(), None);
        buffer.write(b"b", b"20");
        buffer.remove(b"c");
        buffer.write(b"d", b"4");

        assert_eq!(buffer.read(b"a"), Some(b"1".to_vec()));
        assert_eq!(buffer.read(b"b"), Some(b"20".to_vec()));
        assert_eq!(buffer.read(b"c"), None);

        let keys = buffer
            .scan_keys(None, None, Order::Descending)
            .collect::<Vec<_>>();
        assert_eq!(keys, [b"d".to_vec(), b"b".to_vec(), b"a".to_vec()]);

        let records = buffer
            .scan(Some(b"b".as_slice()), Some(b"d".as_slice()), Order::Ascending)
            .collect::<Vec<_>>();
        assert_eq!(records, [(b"b".to_vec(), b"20".to_vec())]);
    }

    #[test]
    fn disassembling_returns_batch() {
        let mut buffer = Buffer::new(base(), None);
        buffer.write(b"x", b"9");
        buffer.remove(b"a");

        let (base, batch) = buffer.disassemble();
        assert_eq!(base.read(b"a"), Some(b"1".to_vec()));
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.get(b"a".as_slice()), Some(&Op::Delete));
    }
}
